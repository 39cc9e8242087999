use image::RgbImage;
use rayon::prelude::*;

use crate::foundation::error::{OverlayError, OverlayResult};
use crate::pipeline::renderer::{OverlayRenderer, RenderedFrame};
use crate::scene::mesh::MeshFrame;
use crate::scene::skeleton::SkeletonFrame;

/// Everything needed to render one frame.
#[derive(Clone, Debug)]
pub struct FrameJob {
    /// Source video frame.
    pub frame: RgbImage,
    /// Body mesh, when the pose model produced one.
    pub mesh: Option<MeshFrame>,
    /// 2D skeleton, when present.
    pub skeleton: Option<SkeletonFrame>,
}

impl FrameJob {
    /// A job with neither mesh nor skeleton.
    pub fn new(frame: RgbImage) -> Self {
        Self {
            frame,
            mesh: None,
            skeleton: None,
        }
    }

    /// Attach a mesh.
    pub fn with_mesh(mut self, mesh: MeshFrame) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Attach a skeleton.
    pub fn with_skeleton(mut self, skeleton: SkeletonFrame) -> Self {
        self.skeleton = Some(skeleton);
        self
    }
}

/// Threading and chunking controls for multi-frame rendering.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Frames handed to the pool at a time.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

impl OverlayRenderer {
    /// Render independent frames, returning results in input order.
    ///
    /// Output is identical to calling [`OverlayRenderer::render`] on each job in turn; only
    /// the scheduling differs. Errors come from pool setup alone, never from frame content.
    #[tracing::instrument(skip(self, jobs, threading), fields(jobs = jobs.len(), parallel = threading.parallel))]
    pub fn render_batch(
        &self,
        jobs: &[FrameJob],
        threading: &RenderThreading,
    ) -> OverlayResult<Vec<RenderedFrame>> {
        let out = if threading.parallel {
            let pool = build_thread_pool(threading.threads)?;
            let chunk_size = threading.chunk_size.max(1);
            let mut out = Vec::with_capacity(jobs.len());
            for chunk in jobs.chunks(chunk_size) {
                let mut frames: Vec<RenderedFrame> =
                    pool.install(|| chunk.par_iter().map(|job| self.render_job(job)).collect());
                out.append(&mut frames);
            }
            out
        } else {
            jobs.iter().map(|job| self.render_job(job)).collect::<Vec<_>>()
        };

        let fallbacks = out.iter().filter(|f| f.diagnostics.fell_back()).count();
        if fallbacks > 0 {
            tracing::debug!(fallbacks, "batch finished with skeleton-only frames");
        }
        Ok(out)
    }

    fn render_job(&self, job: &FrameJob) -> RenderedFrame {
        self.render(&job.frame, job.mesh.as_ref(), job.skeleton.as_ref())
    }
}

fn build_thread_pool(threads: Option<usize>) -> OverlayResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(OverlayError::config(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| OverlayError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
