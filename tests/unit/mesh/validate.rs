use super::*;
use crate::foundation::core::ImageSize;
use crate::scene::mesh::CameraCrop;

fn quad() -> MeshFrame {
    MeshFrame {
        vertices: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        faces: vec![[0, 1, 2], [0, 2, 3]],
        camera_crop: CameraCrop {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
        },
        box_center: [32.0, 32.0],
        box_size: 64.0,
        image_size: ImageSize::new(64, 64),
    }
}

const TOPO: MeshTopology = MeshTopology::new(4, 2);

#[test]
fn well_formed_quad_passes() {
    assert_eq!(validate_mesh(&quad(), &TOPO), Ok(()));
}

#[test]
fn wrong_vertex_count_is_rejected() {
    let mut mesh = quad();
    mesh.vertices.pop();
    assert_eq!(
        validate_mesh(&mesh, &TOPO),
        Err(MeshRejection::VertexCount {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn empty_face_list_is_rejected() {
    let mut mesh = quad();
    mesh.faces.clear();
    assert_eq!(validate_mesh(&mesh, &TOPO), Err(MeshRejection::EmptyFaces));
}

#[test]
fn wrong_face_count_is_rejected() {
    let mut mesh = quad();
    mesh.faces.push([1, 2, 3]);
    assert!(matches!(
        validate_mesh(&mesh, &TOPO),
        Err(MeshRejection::FaceCount {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn nan_and_inf_coordinates_are_rejected() {
    let mut mesh = quad();
    mesh.vertices[2][1] = f64::NAN;
    assert_eq!(
        validate_mesh(&mesh, &TOPO),
        Err(MeshRejection::NonFiniteVertex { index: 2 })
    );

    let mut mesh = quad();
    mesh.vertices[3][2] = f64::INFINITY;
    assert_eq!(
        validate_mesh(&mesh, &TOPO),
        Err(MeshRejection::NonFiniteVertex { index: 3 })
    );
}

#[test]
fn out_of_range_face_index_is_rejected() {
    let mut mesh = quad();
    mesh.faces[1] = [0, 4, 3];
    assert_eq!(
        validate_mesh(&mesh, &TOPO),
        Err(MeshRejection::FaceIndexOutOfRange {
            face: 1,
            vertex: 4,
            vertex_count: 4
        })
    );
}

#[test]
fn zero_scale_camera_is_rejected() {
    let mut mesh = quad();
    mesh.camera_crop.scale = 0.0;
    assert!(matches!(
        validate_mesh(&mesh, &TOPO),
        Err(MeshRejection::Camera(_))
    ));
}

#[test]
fn rejection_converts_to_structural_error() {
    let err: OverlayError = MeshRejection::EmptyFaces.into();
    assert!(err.to_string().starts_with("structural error:"));
}

#[test]
fn oversized_image_is_rejected() {
    let mut mesh = quad();
    mesh.image_size = ImageSize::new(MAX_IMAGE_SIDE, 4);
    assert_eq!(validate_mesh(&mesh, &TOPO), Ok(()));

    mesh.image_size = ImageSize::new(4, u32::MAX);
    assert!(matches!(
        validate_mesh(&mesh, &TOPO),
        Err(MeshRejection::Camera(_))
    ));
}
