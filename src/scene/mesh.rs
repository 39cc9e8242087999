use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::ImageSize;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Weak-perspective camera `(scale, tx, ty)` predicted in crop-normalized space.
///
/// Serialized as `[scale, tx, ty]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct CameraCrop {
    /// Crop scale `s`.
    pub scale: f64,
    /// Horizontal offset in crop space.
    pub tx: f64,
    /// Vertical offset in crop space.
    pub ty: f64,
}

impl From<[f64; 3]> for CameraCrop {
    fn from([scale, tx, ty]: [f64; 3]) -> Self {
        Self { scale, tx, ty }
    }
}

impl From<CameraCrop> for [f64; 3] {
    fn from(c: CameraCrop) -> Self {
        [c.scale, c.tx, c.ty]
    }
}

/// Detection crop box in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropBox {
    /// Box centre x.
    pub center_x: f64,
    /// Box centre y.
    pub center_y: f64,
    /// Square box side length.
    pub size: f64,
}

/// One frame of mesh output from the pose model.
///
/// Read-only to the renderer; every stage borrows it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshFrame {
    /// `V` model-space vertices.
    #[serde(alias = "pred_vertices")]
    pub vertices: Vec<[f64; 3]>,
    /// `F` triangles indexing into `vertices`.
    pub faces: Vec<[u32; 3]>,
    /// Crop camera `(s, tx, ty)`.
    #[serde(alias = "cameraCrop", alias = "pred_cam")]
    pub camera_crop: CameraCrop,
    /// Crop box centre in image pixels.
    #[serde(alias = "boxCenter")]
    pub box_center: [f64; 2],
    /// Crop box size in image pixels.
    #[serde(alias = "boxSize")]
    pub box_size: f64,
    /// Full image `(width, height)` the camera refers to.
    #[serde(alias = "imageSize", alias = "img_size")]
    pub image_size: ImageSize,
}

impl MeshFrame {
    /// Parse a mesh frame from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> OverlayResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| OverlayError::serde(format!("parse mesh frame JSON: {e}")))
    }

    /// Parse a mesh frame from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OverlayError::serde(format!("open mesh frame JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// The detection crop box.
    pub fn crop_box(&self) -> CropBox {
        CropBox {
            center_x: self.box_center[0],
            center_y: self.box_center[1],
            size: self.box_size,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mesh.rs"]
mod tests;
