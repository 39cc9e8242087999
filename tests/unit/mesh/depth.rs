use super::*;
use crate::mesh::project::{FullCamera, ProjectedVertex};
use kurbo::Point;

fn projection(depths: &[f64], valid: &[bool]) -> Projection {
    Projection {
        camera: FullCamera {
            focal: 1.0,
            translation: [0.0, 0.0, 0.0],
            center: Point::ZERO,
        },
        vertices: depths
            .iter()
            .map(|&depth| ProjectedVertex {
                pixel: Point::ZERO,
                depth,
            })
            .collect(),
        valid: valid.to_vec(),
    }
}

#[test]
fn farthest_face_comes_first() {
    let proj = projection(&[5.0, 10.0, 1.0], &[true; 3]);
    let faces = [[0, 0, 0], [1, 1, 1], [2, 2, 2]];
    let order: Vec<usize> = sort_faces_far_to_near(&faces, &proj)
        .iter()
        .map(|f| f.face_index)
        .collect();
    assert_eq!(order, vec![1, 0, 2]);
}

#[test]
fn average_depth_is_mean_of_corners() {
    let proj = projection(&[3.0, 6.0, 9.0], &[true; 3]);
    let order = sort_faces_far_to_near(&[[0, 1, 2]], &proj);
    assert_eq!(
        order,
        vec![FaceDepth {
            face_index: 0,
            average_depth: 6.0
        }]
    );
}

#[test]
fn equal_depths_keep_mesh_order() {
    let proj = projection(&[4.0, 4.0, 4.0, 8.0], &[true; 4]);
    let faces = [[0, 1, 2], [2, 1, 0], [3, 3, 3], [1, 2, 0], [0, 0, 0]];
    let order: Vec<usize> = sort_faces_far_to_near(&faces, &proj)
        .iter()
        .map(|f| f.face_index)
        .collect();
    assert_eq!(order, vec![2, 0, 1, 3, 4]);
}

#[test]
fn faces_with_invalid_vertices_are_dropped() {
    let proj = projection(&[1.0, 2.0, 3.0, 4.0], &[true, false, true, true]);
    let faces = [[0, 2, 3], [0, 1, 2], [3, 2, 0]];
    let order: Vec<usize> = sort_faces_far_to_near(&faces, &proj)
        .iter()
        .map(|f| f.face_index)
        .collect();
    assert_eq!(order, vec![0, 2]);
}

#[test]
fn painter_triangles_follow_sorted_order() {
    let mut proj = projection(&[1.0, 9.0, 5.0], &[true; 3]);
    for (i, v) in proj.vertices.iter_mut().enumerate() {
        v.pixel = Point::new(i as f64, 0.0);
    }
    let faces = [[0, 0, 0], [1, 1, 1], [2, 2, 2]];
    let order = sort_faces_far_to_near(&faces, &proj);
    let tris = painter_triangles(&faces, &order, &proj);
    let xs: Vec<f64> = tris.iter().map(|t| t[0].x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 0.0]);
}
