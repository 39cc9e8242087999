use kurbo::Point;

use crate::mesh::project::Projection;

/// A face and the mean `zCam` of its corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceDepth {
    /// Index into `MeshFrame::faces`.
    pub face_index: usize,
    /// `(z0 + z1 + z2) / 3`.
    pub average_depth: f64,
}

/// Painter's order: farthest face first.
///
/// Depth grows with distance from the camera, so faces are ordered by descending
/// `average_depth`. The sort is stable, so equal depths keep mesh order. Faces touching an
/// invalid vertex are dropped.
pub fn sort_faces_far_to_near(faces: &[[u32; 3]], projection: &Projection) -> Vec<FaceDepth> {
    let mut order: Vec<FaceDepth> = faces
        .iter()
        .enumerate()
        .filter(|(_, face)| projection.face_is_valid(**face))
        .map(|(face_index, face)| {
            let [a, b, c] = face.map(|i| projection.vertices[i as usize].depth);
            FaceDepth {
                face_index,
                average_depth: (a + b + c) / 3.0,
            }
        })
        .collect();

    order.sort_by(|a, b| b.average_depth.total_cmp(&a.average_depth));
    order
}

/// Pixel-space corners of each face in `order`.
pub fn painter_triangles(
    faces: &[[u32; 3]],
    order: &[FaceDepth],
    projection: &Projection,
) -> Vec<[Point; 3]> {
    order
        .iter()
        .map(|fd| faces[fd.face_index].map(|i| projection.vertices[i as usize].pixel))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/depth.rs"]
mod tests;
