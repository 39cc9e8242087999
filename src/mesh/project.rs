use kurbo::Point;

use crate::foundation::core::ImageSize;
use crate::scene::mesh::{CameraCrop, CropBox, MeshFrame};

/// Focal length the pose model was trained with, at [`MODEL_IMAGE_SIZE`].
pub const FOCAL_LENGTH: f64 = 5000.0;
/// Square crop side the pose model consumes.
pub const MODEL_IMAGE_SIZE: f64 = 256.0;

/// Full-image perspective camera derived from a crop camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FullCamera {
    /// Scaled focal length in pixels.
    pub focal: f64,
    /// Camera translation `(tx, ty, tz)` in full-image space.
    pub translation: [f64; 3],
    /// Principal point, the image centre.
    pub center: Point,
}

impl FullCamera {
    /// `5000 * max(width, height) / 256`.
    pub fn scaled_focal(image_size: ImageSize) -> f64 {
        FOCAL_LENGTH * f64::from(image_size.max_side()) / MODEL_IMAGE_SIZE
    }

    /// Crop-to-full transform.
    ///
    /// `crop.scale * crop_box.size` must be non-zero; the validator guarantees it.
    pub fn from_crop(crop: CameraCrop, crop_box: CropBox, image_size: ImageSize) -> Self {
        let focal = Self::scaled_focal(image_size);
        let w_2 = f64::from(image_size.width) / 2.0;
        let h_2 = f64::from(image_size.height) / 2.0;
        let bs = crop_box.size * crop.scale;
        let tx = 2.0 * (crop_box.center_x - w_2) / bs + crop.tx;
        let ty = 2.0 * (crop_box.center_y - h_2) / bs + crop.ty;
        let tz = 2.0 * focal / bs;
        Self {
            focal,
            translation: [tx, ty, tz],
            center: Point::new(w_2, h_2),
        }
    }

    /// Camera for a mesh frame.
    pub fn for_mesh(mesh: &MeshFrame) -> Self {
        Self::from_crop(mesh.camera_crop, mesh.crop_box(), mesh.image_size)
    }

    /// Project one model-space vertex.
    ///
    /// `|zCam|` below `depth_epsilon` is clamped to `depth_epsilon` (keeping its sign, positive
    /// for exact zero) for the divide only; the returned depth is the unclamped `zCam`.
    pub fn project(&self, v: [f64; 3], depth_epsilon: f64) -> ProjectedVertex {
        let [tx, ty, tz] = self.translation;
        let x_cam = v[0] + tx;
        let y_cam = v[1] + ty;
        let z_cam = v[2] + tz;

        let z_div = if z_cam.abs() < depth_epsilon {
            if z_cam == 0.0 {
                depth_epsilon
            } else {
                depth_epsilon.copysign(z_cam)
            }
        } else {
            z_cam
        };

        ProjectedVertex {
            pixel: Point::new(
                self.focal * x_cam / z_div + self.center.x,
                self.focal * y_cam / z_div + self.center.y,
            ),
            depth: z_cam,
        }
    }
}

/// A vertex in pixel space plus its camera-space depth.
///
/// Pixels outside the image are kept as-is; clipping happens at write time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedVertex {
    /// Pixel position.
    pub pixel: Point,
    /// `zCam`; larger is farther from the camera.
    pub depth: f64,
}

impl ProjectedVertex {
    /// Return `true` when both pixel coordinates and the depth are finite.
    pub fn is_finite(&self) -> bool {
        self.pixel.x.is_finite() && self.pixel.y.is_finite() && self.depth.is_finite()
    }
}

/// Projection of every vertex of one frame, parallel to `MeshFrame::vertices`.
#[derive(Clone, Debug)]
pub struct Projection {
    /// Camera used.
    pub camera: FullCamera,
    /// Projected vertices.
    pub vertices: Vec<ProjectedVertex>,
    /// `false` for vertices whose projection is not finite.
    pub valid: Vec<bool>,
}

impl Projection {
    /// Number of vertices flagged invalid.
    pub fn invalid_count(&self) -> usize {
        self.valid.iter().filter(|v| !**v).count()
    }

    /// Return `true` when all three corners of `face` are valid.
    pub fn face_is_valid(&self, face: [u32; 3]) -> bool {
        face.iter()
            .all(|&i| self.valid.get(i as usize).copied().unwrap_or(false))
    }
}

/// Project all vertices of `mesh` through its full-image camera.
pub fn project_vertices(mesh: &MeshFrame, depth_epsilon: f64) -> Projection {
    let camera = FullCamera::for_mesh(mesh);
    let vertices: Vec<ProjectedVertex> = mesh
        .vertices
        .iter()
        .map(|&v| camera.project(v, depth_epsilon))
        .collect();
    let valid = vertices.iter().map(ProjectedVertex::is_finite).collect();
    Projection {
        camera,
        vertices,
        valid,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/project.rs"]
mod tests;
