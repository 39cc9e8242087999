use super::*;

fn smpl_joints() -> Vec<Joint> {
    SMPL_JOINT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Joint::new(*name, i as f64, i as f64, 1.0))
        .collect()
}

#[test]
fn default_connections_cover_all_smpl_bones() {
    let skel = SkeletonFrame::with_default_connections(smpl_joints());
    assert_eq!(skel.connections.len(), SMPL_BONES.len());
    // pelvis(0) -> spine1(3)
    assert_eq!(skel.connections[0], (0, 3));
    // right_ankle(8) -> right_foot(11)
    assert_eq!(skel.connections[22], (8, 11));
}

#[test]
fn default_connections_skip_missing_joints() {
    let joints = vec![
        Joint::new("neck", 0.0, 0.0, 1.0),
        Joint::new("head", 0.0, 5.0, 1.0),
        Joint::new("left_knee", 1.0, 1.0, 1.0),
    ];
    let skel = SkeletonFrame::with_default_connections(joints);
    assert_eq!(skel.connections, vec![(0, 1)]);
}

#[test]
fn json_without_connections_uses_smpl_bones_and_keypoints_alias() {
    let json = r#"{
        "keypoints": [
            {"name": "neck", "x": 10, "y": 10, "confidence": 0.9},
            {"name": "head", "x": 10, "y": 2}
        ]
    }"#;
    let skel = SkeletonFrame::from_reader(json.as_bytes()).unwrap();
    assert_eq!(skel.joints.len(), 2);
    assert_eq!(skel.joints[1].confidence, 1.0);
    assert_eq!(skel.connections, vec![(0, 1)]);
}

#[test]
fn json_explicit_connections_are_kept_verbatim() {
    let json = r#"{
        "joints": [
            {"name": "a", "x": 0, "y": 0, "confidence": 1},
            {"name": "b", "x": 1, "y": 1, "confidence": 1}
        ],
        "connections": [[1, 0], [0, 7]]
    }"#;
    let skel = SkeletonFrame::from_reader(json.as_bytes()).unwrap();
    assert_eq!(skel.connections, vec![(1, 0), (0, 7)]);
}

#[test]
fn serialized_skeleton_reads_back_identically() {
    let skel = SkeletonFrame::new(
        vec![Joint::new("a", 1.5, 2.5, 0.5), Joint::new("b", 3.0, 4.0, 1.0)],
        vec![(0, 1)],
    );
    let json = serde_json::to_string(&skel).unwrap();
    let back = SkeletonFrame::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, skel);
}
