use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::render::backend::BackendKind;

/// SMPL body model vertex count.
pub const SMPL_VERTEX_COUNT: usize = 6890;
/// SMPL body model face count.
pub const SMPL_FACE_COUNT: usize = 13776;
/// Upper bound for `joint_radius` and `line_thickness`.
pub const MAX_STROKE_PX: u32 = 256;

/// Fixed vertex and face counts of the body model feeding the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshTopology {
    /// Expected `V`.
    pub vertex_count: usize,
    /// Expected `F`.
    pub face_count: usize,
}

impl MeshTopology {
    /// Topology with explicit counts (synthetic meshes, other body models).
    pub const fn new(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertex_count,
            face_count,
        }
    }

    /// The SMPL body model.
    pub const fn smpl() -> Self {
        Self::new(SMPL_VERTEX_COUNT, SMPL_FACE_COUNT)
    }
}

impl Default for MeshTopology {
    fn default() -> Self {
        Self::smpl()
    }
}

/// Renderer options.
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Mesh fill color.
    pub mesh_color: Rgb8,
    /// Mesh opacity in `[0,1]`.
    pub mesh_alpha: f64,
    /// Skeleton segment and joint color.
    pub skeleton_color: Rgb8,
    /// Joints with `confidence <= confidence_threshold` are not drawn.
    pub confidence_threshold: f64,
    /// Floor for `|zCam|` before the perspective divide.
    pub depth_epsilon: f64,
    /// Joint marker radius in pixels (0 disables markers).
    pub joint_radius: u32,
    /// Segment thickness in pixels.
    pub line_thickness: u32,
    /// Advisory per-frame wall-clock budget.
    pub frame_budget_ms: f64,
    /// Expected body model topology.
    pub topology: MeshTopology,
    /// Preferred rasterization backend.
    pub backend: BackendKind,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            mesh_color: Rgb8::new(166, 189, 219),
            mesh_alpha: 0.6,
            skeleton_color: Rgb8::new(255, 165, 0),
            confidence_threshold: 0.0,
            depth_epsilon: 1e-6,
            joint_radius: 6,
            line_thickness: 3,
            frame_budget_ms: 150.0,
            topology: MeshTopology::smpl(),
            backend: BackendKind::Software,
        }
    }
}

impl OverlayConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> OverlayResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| OverlayError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OverlayError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check option ranges.
    pub fn validate(&self) -> OverlayResult<()> {
        if !self.mesh_alpha.is_finite() || !(0.0..=1.0).contains(&self.mesh_alpha) {
            return Err(OverlayError::config(format!(
                "mesh_alpha must be in [0, 1], got {}",
                self.mesh_alpha
            )));
        }
        if !self.depth_epsilon.is_finite() || self.depth_epsilon <= 0.0 {
            return Err(OverlayError::config(format!(
                "depth_epsilon must be a positive finite number, got {}",
                self.depth_epsilon
            )));
        }
        if !self.confidence_threshold.is_finite() {
            return Err(OverlayError::config("confidence_threshold must be finite"));
        }
        if self.joint_radius > MAX_STROKE_PX {
            return Err(OverlayError::config(format!(
                "joint_radius must be <= {MAX_STROKE_PX}, got {}",
                self.joint_radius
            )));
        }
        if self.line_thickness > MAX_STROKE_PX {
            return Err(OverlayError::config(format!(
                "line_thickness must be <= {MAX_STROKE_PX}, got {}",
                self.line_thickness
            )));
        }
        if !self.frame_budget_ms.is_finite() || self.frame_budget_ms < 0.0 {
            return Err(OverlayError::config(
                "frame_budget_ms must be a non-negative finite number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
