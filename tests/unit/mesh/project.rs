use super::*;

fn camera_at(translation: [f64; 3]) -> FullCamera {
    FullCamera {
        focal: 100.0,
        translation,
        center: Point::new(32.0, 32.0),
    }
}

fn mesh_with(vertices: Vec<[f64; 3]>) -> MeshFrame {
    MeshFrame {
        vertices,
        faces: vec![[0, 1, 2]],
        camera_crop: CameraCrop {
            scale: 1.0,
            tx: 0.1,
            ty: -0.2,
        },
        box_center: [320.0, 240.0],
        box_size: 200.0,
        image_size: ImageSize::new(640, 480),
    }
}

#[test]
fn scaled_focal_uses_longest_side() {
    assert_eq!(FullCamera::scaled_focal(ImageSize::new(640, 480)), 12500.0);
    assert_eq!(FullCamera::scaled_focal(ImageSize::new(480, 640)), 12500.0);
    assert_eq!(FullCamera::scaled_focal(ImageSize::new(256, 256)), 5000.0);
}

#[test]
fn crop_to_full_matches_reference_formula() {
    let cam = FullCamera::for_mesh(&mesh_with(vec![]));
    assert_eq!(cam.focal, 12500.0);
    assert_eq!(cam.translation, [0.1, -0.2, 125.0]);
    assert_eq!(cam.center, Point::new(320.0, 240.0));

    let off_center = FullCamera::from_crop(
        CameraCrop {
            scale: 0.5,
            tx: 0.0,
            ty: 0.0,
        },
        CropBox {
            center_x: 420.0,
            center_y: 140.0,
            size: 200.0,
        },
        ImageSize::new(640, 480),
    );
    // bs = 100
    assert_eq!(off_center.translation, [2.0, -2.0, 250.0]);
}

#[test]
fn perspective_divide_places_points_around_center() {
    let cam = camera_at([0.0, 0.0, 10.0]);
    let p = cam.project([0.0, 0.0, 0.0], 1e-6);
    assert_eq!(p.pixel, Point::new(32.0, 32.0));
    assert_eq!(p.depth, 10.0);

    let q = cam.project([1.0, -2.0, 10.0], 1e-6);
    assert_eq!(q.pixel, Point::new(37.0, 22.0));
    assert_eq!(q.depth, 20.0);
}

#[test]
fn near_zero_depth_is_clamped_with_sign_for_the_divide_only() {
    let cam = camera_at([0.0, 0.0, 0.0]);

    let zero = cam.project([1.0, 0.0, 0.0], 1e-3);
    assert_eq!(zero.depth, 0.0);
    assert_eq!(zero.pixel.x, 100.0 / 1e-3 + 32.0);
    assert!(zero.is_finite());

    let neg = cam.project([1.0, 0.0, -1e-9], 1e-3);
    assert_eq!(neg.depth, -1e-9);
    assert_eq!(neg.pixel.x, 100.0 / -1e-3 + 32.0);
}

#[test]
fn off_canvas_pixels_are_not_clamped() {
    let cam = camera_at([0.0, 0.0, 1.0]);
    let p = cam.project([5.0, 5.0, 0.0], 1e-6);
    assert_eq!(p.pixel, Point::new(532.0, 532.0));
}

#[test]
fn non_finite_projection_marks_vertex_and_faces_invalid() {
    let mesh = mesh_with(vec![
        [0.0, 0.0, 0.0],
        [f64::NAN, 0.0, 0.0],
        [1e308, 0.0, -125.0],
        [0.1, 0.1, 0.0],
    ]);
    let proj = project_vertices(&mesh, 1e-6);
    assert_eq!(proj.valid, vec![true, false, false, true]);
    assert_eq!(proj.invalid_count(), 2);
    assert!(proj.face_is_valid([0, 3, 0]));
    assert!(!proj.face_is_valid([0, 1, 3]));
    assert!(!proj.face_is_valid([0, 3, 9]));
}

#[test]
fn projection_is_parallel_to_vertices_and_leaves_input_untouched() {
    let mesh = mesh_with(vec![[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]]);
    let before = mesh.clone();
    let proj = project_vertices(&mesh, 1e-6);
    assert_eq!(proj.vertices.len(), 3);
    assert_eq!(proj.valid.len(), 3);
    assert_eq!(mesh, before);
}
