use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};
use crate::render::raster::{MeshPaint, ScreenTriangle, TriangleCull};
use crate::render::surface::RenderSurface;

/// Rows handed to one worker by the banded backend.
pub const DEFAULT_BAND_ROWS: u32 = 32;

/// Available rasterizers.
///
/// - `Software` is always available.
/// - `Banded` needs the `banded-raster` cargo feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single-threaded scanline rasterizer.
    #[default]
    Software,
    /// Row bands rasterized in parallel; byte-identical to `Software`.
    Banded,
}

/// Counters from one rasterization pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RasterStats {
    /// Triangles that reached scan conversion.
    pub faces_drawn: usize,
    /// Degenerate, off-image or out-of-range triangles.
    pub faces_culled: usize,
    /// Pixel writes, counting overdraw.
    pub pixels_written: u64,
}

/// Fills triangles, in the given order, into a surface.
///
/// Triangles arrive in painter's order (farthest first) as pixel-space corners. Each covered
/// pixel is blended onto the surface's current value, so later triangles land on top.
pub trait RasterBackend: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    /// Rasterize `triangles` into `surface`.
    fn rasterize(
        &self,
        surface: &mut RenderSurface,
        triangles: &[[Point; 3]],
        paint: &MeshPaint,
    ) -> OverlayResult<RasterStats>;
}

/// Create a rasterizer.
///
/// Returns [`OverlayError::BackendUnavailable`] when `kind` is compiled out.
pub fn create_backend(kind: BackendKind) -> OverlayResult<Box<dyn RasterBackend>> {
    match kind {
        BackendKind::Software => Ok(Box::new(SoftwareBackend)),
        #[cfg(feature = "banded-raster")]
        BackendKind::Banded => Ok(Box::new(BandedBackend::new(DEFAULT_BAND_ROWS))),
        #[allow(unreachable_patterns)]
        _ => Err(OverlayError::backend_unavailable(format!(
            "{kind:?} rasterizer is not compiled in"
        ))),
    }
}

fn setup_all(
    triangles: &[[Point; 3]],
    surface: &RenderSurface,
    stats: &mut RasterStats,
) -> Vec<ScreenTriangle> {
    let size = surface.size();
    let mut out = Vec::with_capacity(triangles.len());
    for (i, corners) in triangles.iter().enumerate() {
        match ScreenTriangle::setup(*corners, size) {
            Ok(tri) => out.push(tri),
            Err(cull) => {
                if cull == TriangleCull::OutOfRange {
                    tracing::trace!(triangle = i, "triangle corner outside guard band, skipped");
                }
                stats.faces_culled += 1;
            }
        }
    }
    stats.faces_drawn = out.len();
    out
}

/// The baseline rasterizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareBackend;

impl RasterBackend for SoftwareBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn rasterize(
        &self,
        surface: &mut RenderSurface,
        triangles: &[[Point; 3]],
        paint: &MeshPaint,
    ) -> OverlayResult<RasterStats> {
        let mut stats = RasterStats::default();
        let prepared = setup_all(triangles, surface, &mut stats);
        let size = surface.size();
        let bytes = surface.bytes_mut();
        for tri in &prepared {
            stats.pixels_written += tri.fill_band(bytes, size.width, 0, size.height, paint);
        }
        Ok(stats)
    }
}

/// Splits the surface into horizontal bands and rasterizes them on the rayon pool.
///
/// Each band walks every triangle in order, so per-pixel blend order is the same as
/// [`SoftwareBackend`].
#[cfg(feature = "banded-raster")]
#[derive(Clone, Copy, Debug)]
pub struct BandedBackend {
    band_rows: u32,
}

#[cfg(feature = "banded-raster")]
impl BandedBackend {
    /// `band_rows` of zero is treated as one.
    pub fn new(band_rows: u32) -> Self {
        Self {
            band_rows: band_rows.max(1),
        }
    }
}

#[cfg(feature = "banded-raster")]
impl RasterBackend for BandedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Banded
    }

    fn rasterize(
        &self,
        surface: &mut RenderSurface,
        triangles: &[[Point; 3]],
        paint: &MeshPaint,
    ) -> OverlayResult<RasterStats> {
        use rayon::prelude::*;

        let mut stats = RasterStats::default();
        let prepared = setup_all(triangles, surface, &mut stats);
        let size = surface.size();
        if size.is_empty() {
            return Ok(stats);
        }
        let band_rows = self.band_rows;
        let band_bytes = (size.width as usize)
            .checked_mul(3)
            .and_then(|row| row.checked_mul(band_rows as usize))
            .ok_or_else(|| OverlayError::numeric("band size overflow"))?;

        stats.pixels_written = surface
            .bytes_mut()
            .par_chunks_mut(band_bytes)
            .enumerate()
            .map(|(band_idx, band)| {
                let y0 = band_idx as u32 * band_rows;
                let y1 = (y0 + band_rows).min(size.height);
                prepared
                    .iter()
                    .map(|tri| tri.fill_band(band, size.width, y0, y1, paint))
                    .sum::<u64>()
            })
            .sum();
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
