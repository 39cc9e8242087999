use crate::foundation::error::OverlayError;
use crate::scene::config::MeshTopology;
use crate::scene::mesh::MeshFrame;

/// Largest accepted `image_size` side, in pixels.
pub const MAX_IMAGE_SIDE: u32 = 16384;

/// Why a [`MeshFrame`] was refused before projection.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeshRejection {
    /// `vertices.len()` differs from the model's `V`.
    #[error("expected {expected} vertices, got {actual}")]
    VertexCount {
        /// Model `V`.
        expected: usize,
        /// Received count.
        actual: usize,
    },
    /// `faces.len()` differs from the model's `F`.
    #[error("expected {expected} faces, got {actual}")]
    FaceCount {
        /// Model `F`.
        expected: usize,
        /// Received count.
        actual: usize,
    },
    /// The frame carries no triangles at all.
    #[error("mesh has no faces")]
    EmptyFaces,
    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Offending vertex.
        index: usize,
    },
    /// A face references a vertex outside `[0, V)`.
    #[error("face {face} references vertex {vertex}, out of range for {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Offending face.
        face: usize,
        /// Referenced vertex index.
        vertex: u32,
        /// Number of vertices in the frame.
        vertex_count: usize,
    },
    /// Crop camera, crop box or image size cannot produce a projection.
    #[error("invalid camera: {0}")]
    Camera(String),
}

impl From<MeshRejection> for OverlayError {
    fn from(r: MeshRejection) -> Self {
        OverlayError::structural(r.to_string())
    }
}

/// Check a mesh frame against the expected topology.
///
/// Checks run in a fixed order (counts, faces, vertices, indices, camera) and the first failure
/// is returned. Has no side effects.
pub fn validate_mesh(mesh: &MeshFrame, topology: &MeshTopology) -> Result<(), MeshRejection> {
    if mesh.vertices.len() != topology.vertex_count {
        return Err(MeshRejection::VertexCount {
            expected: topology.vertex_count,
            actual: mesh.vertices.len(),
        });
    }
    if mesh.faces.is_empty() {
        return Err(MeshRejection::EmptyFaces);
    }
    if mesh.faces.len() != topology.face_count {
        return Err(MeshRejection::FaceCount {
            expected: topology.face_count,
            actual: mesh.faces.len(),
        });
    }

    if let Some(index) = mesh
        .vertices
        .iter()
        .position(|v| v.iter().any(|c| !c.is_finite()))
    {
        return Err(MeshRejection::NonFiniteVertex { index });
    }

    let vertex_count = mesh.vertices.len();
    for (face, tri) in mesh.faces.iter().enumerate() {
        if let Some(&vertex) = tri.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshRejection::FaceIndexOutOfRange {
                face,
                vertex,
                vertex_count,
            });
        }
    }

    validate_camera(mesh)
}

fn validate_camera(mesh: &MeshFrame) -> Result<(), MeshRejection> {
    let cam = mesh.camera_crop;
    if ![cam.scale, cam.tx, cam.ty].iter().all(|v| v.is_finite()) {
        return Err(MeshRejection::Camera(
            "crop camera has a non-finite component".to_string(),
        ));
    }
    if !mesh.box_center.iter().all(|v| v.is_finite()) {
        return Err(MeshRejection::Camera(
            "box center is not finite".to_string(),
        ));
    }
    if !mesh.box_size.is_finite() || mesh.box_size <= 0.0 {
        return Err(MeshRejection::Camera(format!(
            "box size must be positive, got {}",
            mesh.box_size
        )));
    }
    let bs = mesh.box_size * cam.scale;
    if bs == 0.0 || !bs.is_finite() {
        return Err(MeshRejection::Camera(format!(
            "box_size * scale must be non-zero, got {bs}"
        )));
    }
    if mesh.image_size.is_empty() {
        return Err(MeshRejection::Camera("image size is empty".to_string()));
    }
    if mesh.image_size.max_side() > MAX_IMAGE_SIDE {
        return Err(MeshRejection::Camera(format!(
            "image size {}x{} exceeds {MAX_IMAGE_SIDE} px per side",
            mesh.image_size.width, mesh.image_size.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/validate.rs"]
mod tests;
