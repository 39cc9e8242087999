use serde::Serialize;

use crate::render::backend::BackendKind;

/// States of the per-frame stage machine.
///
/// `Init → Validate → Project → Sort → Rasterize → Overlay → Done`. A failure anywhere in
/// `Validate..=Rasterize` moves to `ErrorFallback`, which jumps to `Overlay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Surface copied from the source frame.
    Init,
    /// Mesh checked against topology and frame size.
    Validate,
    /// Vertices projected to pixels.
    Project,
    /// Faces ordered far to near.
    Sort,
    /// Faces blended into the surface.
    Rasterize,
    /// Mesh abandoned; surface reset to the source frame.
    ErrorFallback,
    /// Skeleton drawn.
    Overlay,
    /// Image handed back.
    Done,
}

/// What happened while rendering one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostics {
    /// The mesh reached the output image.
    pub mesh_rendered: bool,
    /// Faces scan-converted.
    pub faces_drawn: usize,
    /// Faces dropped for invalid vertices or culled by the rasterizer.
    pub faces_culled: usize,
    /// Vertices with a non-finite projection.
    pub vertices_invalid: usize,
    /// Wall-clock time for the whole frame.
    pub elapsed_ms: f64,
    /// `elapsed_ms` exceeded the configured advisory budget.
    pub over_budget: bool,
    /// Why the mesh was skipped, if it was.
    pub fallback_reason: Option<String>,
    /// Rasterizer in use.
    pub backend: BackendKind,
    /// Visited states, in order.
    pub stages: Vec<Stage>,
}

impl Diagnostics {
    pub(crate) fn new(backend: BackendKind) -> Self {
        Self {
            mesh_rendered: false,
            faces_drawn: 0,
            faces_culled: 0,
            vertices_invalid: 0,
            elapsed_ms: 0.0,
            over_budget: false,
            fallback_reason: None,
            backend,
            stages: Vec::with_capacity(8),
        }
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        tracing::debug!(?stage, "enter stage");
        self.stages.push(stage);
    }

    /// The most recent state, `None` before `Init`.
    pub fn last_stage(&self) -> Option<Stage> {
        self.stages.last().copied()
    }

    /// The mesh stages were abandoned for this frame.
    pub fn fell_back(&self) -> bool {
        self.stages.contains(&Stage::ErrorFallback)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/diagnostics.rs"]
mod tests;
