use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use image::RgbImage;

use crate::foundation::error::{OverlayError, OverlayResult};
use crate::mesh::depth::{painter_triangles, sort_faces_far_to_near};
use crate::mesh::project::project_vertices;
use crate::mesh::validate::validate_mesh;
use crate::pipeline::diagnostics::{Diagnostics, Stage};
use crate::render::backend::{RasterBackend, SoftwareBackend, create_backend};
use crate::render::raster::MeshPaint;
use crate::render::skeleton::{SkeletonStyle, draw_skeleton};
use crate::render::surface::RenderSurface;
use crate::scene::config::OverlayConfig;
use crate::scene::mesh::MeshFrame;
use crate::scene::skeleton::SkeletonFrame;

/// Output of one [`OverlayRenderer::render`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    /// RGB8 image with the source frame's dimensions.
    pub image: RgbImage,
    /// What happened along the way.
    pub diagnostics: Diagnostics,
}

/// Composites a body mesh and a skeleton over video frames.
///
/// The renderer holds only immutable configuration, so one instance can serve any number of
/// frames, from any number of threads. No state carries over between frames.
pub struct OverlayRenderer {
    cfg: OverlayConfig,
    backend: Box<dyn RasterBackend>,
    paint: MeshPaint,
    style: SkeletonStyle,
}

impl fmt::Debug for OverlayRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayRenderer")
            .field("cfg", &self.cfg)
            .field("backend", &self.backend.kind())
            .finish_non_exhaustive()
    }
}

impl OverlayRenderer {
    /// Build a renderer using the backend named in `cfg`.
    ///
    /// A backend that is not compiled in is replaced by the software rasterizer, which
    /// produces identical pixels.
    pub fn new(cfg: OverlayConfig) -> OverlayResult<Self> {
        let backend = match create_backend(cfg.backend) {
            Ok(b) => b,
            Err(OverlayError::BackendUnavailable(reason)) => {
                tracing::debug!(%reason, "using software rasterizer");
                Box::new(SoftwareBackend)
            }
            Err(e) => return Err(e),
        };
        Self::with_backend(cfg, backend)
    }

    /// Build a renderer around an explicit rasterizer.
    pub fn with_backend(cfg: OverlayConfig, backend: Box<dyn RasterBackend>) -> OverlayResult<Self> {
        cfg.validate()?;
        let paint = MeshPaint::new(cfg.mesh_color.to_array(), cfg.mesh_alpha);
        let style = SkeletonStyle::from_config(&cfg);
        Ok(Self {
            cfg,
            backend,
            paint,
            style,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.cfg
    }

    /// Render one frame. Always produces an image.
    ///
    /// Mesh failures of any kind (invalid data, a panicking stage) leave the frame untouched
    /// by the mesh; the skeleton is drawn either way.
    #[tracing::instrument(
        skip(self, frame, mesh, skeleton),
        fields(width = frame.width(), height = frame.height())
    )]
    pub fn render(
        &self,
        frame: &RgbImage,
        mesh: Option<&MeshFrame>,
        skeleton: Option<&SkeletonFrame>,
    ) -> RenderedFrame {
        let started = Instant::now();
        let mut diag = Diagnostics::new(self.backend.kind());
        diag.enter(Stage::Init);
        let mut surface = RenderSurface::from_frame(frame);

        if let Some(mesh) = mesh {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                self.mesh_stages(&mut surface, mesh, &mut diag)
            }));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e),
                Err(payload) => Some(OverlayError::catastrophic(panic_message(payload.as_ref()))),
            };
            match failure {
                None => diag.mesh_rendered = true,
                Some(err) => {
                    tracing::warn!(
                        stage = ?diag.last_stage(),
                        error = %err,
                        "mesh skipped, rendering skeleton only"
                    );
                    diag.enter(Stage::ErrorFallback);
                    diag.fallback_reason = Some(err.to_string());
                    diag.faces_drawn = 0;
                    diag.faces_culled = 0;
                    diag.vertices_invalid = 0;
                    surface = RenderSurface::from_frame(frame);
                }
            }
        }

        diag.enter(Stage::Overlay);
        if let Some(skeleton) = skeleton {
            let drawn = panic::catch_unwind(AssertUnwindSafe(|| {
                draw_skeleton(&mut surface, skeleton, &self.style)
            }));
            match drawn {
                Ok(stats) => tracing::debug!(
                    segments = stats.segments_drawn,
                    skipped = stats.segments_skipped,
                    joints = stats.joints_drawn,
                    "skeleton drawn"
                ),
                Err(payload) => tracing::warn!(
                    error = %panic_message(payload.as_ref()),
                    "skeleton overlay aborted"
                ),
            }
        }
        diag.enter(Stage::Done);

        diag.elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if diag.elapsed_ms > self.cfg.frame_budget_ms {
            diag.over_budget = true;
            tracing::warn!(
                elapsed_ms = diag.elapsed_ms,
                budget_ms = self.cfg.frame_budget_ms,
                "frame over budget"
            );
        }

        RenderedFrame {
            image: surface.into_image(),
            diagnostics: diag,
        }
    }

    fn mesh_stages(
        &self,
        surface: &mut RenderSurface,
        mesh: &MeshFrame,
        diag: &mut Diagnostics,
    ) -> OverlayResult<()> {
        diag.enter(Stage::Validate);
        let frame_size = surface.size();
        if mesh.image_size != frame_size {
            return Err(OverlayError::structural(format!(
                "mesh image size {}x{} does not match frame {}x{}",
                mesh.image_size.width, mesh.image_size.height, frame_size.width, frame_size.height
            )));
        }
        validate_mesh(mesh, &self.cfg.topology)?;

        diag.enter(Stage::Project);
        let projection = project_vertices(mesh, self.cfg.depth_epsilon);
        diag.vertices_invalid = projection.invalid_count();
        if diag.vertices_invalid > 0 {
            tracing::trace!(count = diag.vertices_invalid, "vertices with non-finite projection");
        }

        diag.enter(Stage::Sort);
        let order = sort_faces_far_to_near(&mesh.faces, &projection);
        let dropped = mesh.faces.len() - order.len();
        let triangles = painter_triangles(&mesh.faces, &order, &projection);

        diag.enter(Stage::Rasterize);
        let stats = self.backend.rasterize(surface, &triangles, &self.paint)?;
        diag.faces_drawn = stats.faces_drawn;
        diag.faces_culled = stats.faces_culled + dropped;
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic with a non-string payload".to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/renderer.rs"]
mod tests;
