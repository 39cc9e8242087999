//! Triangle scan conversion.
//!
//! Vertices snap to a 1/256 pixel grid and coverage is tested at pixel centres with exact
//! integer edge functions. Ties on an edge go to the triangle for which that edge is a top or
//! left edge, so triangles sharing an edge cover each pixel along it exactly once.

use kurbo::Point;

use crate::foundation::core::ImageSize;
use crate::foundation::math::blend_channel;

const SUBPIXEL_BITS: u32 = 8;
const SUBPIXEL: i128 = 1 << SUBPIXEL_BITS;
const HALF_SUBPIXEL: i128 = SUBPIXEL / 2;

/// Vertices farther than this many pixels from the origin cannot be snapped.
const GUARD_BAND_PX: f64 = (1u64 << 40) as f64;

/// Mesh color at a fixed opacity, expanded into per-channel blend tables.
///
/// `lut[c][bg]` is `round(color[c]*alpha + bg*(1-alpha))`, the same value
/// [`blend_channel`] produces.
#[derive(Clone, Debug)]
pub struct MeshPaint {
    color: [u8; 3],
    alpha: f64,
    lut: [[u8; 256]; 3],
}

impl MeshPaint {
    /// Build the blend tables. `alpha` is clamped to `[0,1]`.
    pub fn new(color: [u8; 3], alpha: f64) -> Self {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        let mut lut = [[0u8; 256]; 3];
        for (c, table) in lut.iter_mut().enumerate() {
            for (bg, out) in table.iter_mut().enumerate() {
                *out = blend_channel(color[c], bg as u8, alpha);
            }
        }
        Self { color, alpha, lut }
    }

    /// The fill color.
    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    /// The clamped opacity.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    fn apply(&self, px: &mut [u8]) {
        px[0] = self.lut[0][px[0] as usize];
        px[1] = self.lut[1][px[1] as usize];
        px[2] = self.lut[2][px[2] as usize];
    }
}

/// Inclusive pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// First column.
    pub x0: u32,
    /// First row.
    pub y0: u32,
    /// Last column (inclusive).
    pub x1: u32,
    /// Last row (inclusive).
    pub y1: u32,
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    a: [i128; 2],
    b: [i128; 2],
    bias: i128,
}

impl Edge {
    fn new(a: [i128; 2], b: [i128; 2]) -> Self {
        let top = a[1] == b[1] && b[0] > a[0];
        let left = b[1] < a[1];
        Self {
            a,
            b,
            bias: if top || left { 0 } else { -1 },
        }
    }

    fn eval(&self, p: [i128; 2]) -> i128 {
        edge_function(self.a, self.b, p) + self.bias
    }

    fn step_x(&self) -> i128 {
        -(self.b[1] - self.a[1]) * SUBPIXEL
    }

    fn step_y(&self) -> i128 {
        (self.b[0] - self.a[0]) * SUBPIXEL
    }
}

fn edge_function(a: [i128; 2], b: [i128; 2], p: [i128; 2]) -> i128 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// A triangle ready for scan conversion: snapped, wound consistently and clipped to the image.
#[derive(Clone, Debug)]
pub struct ScreenTriangle {
    edges: [Edge; 3],
    bounds: PixelRect,
}

/// Why a triangle produced no [`ScreenTriangle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangleCull {
    /// Zero area on the subpixel grid.
    Degenerate,
    /// No pixel centre of its bounding box lies on the image.
    OffImage,
    /// A corner is non-finite or beyond the guard band.
    OutOfRange,
}

impl ScreenTriangle {
    /// Snap, orient and clip a triangle given in pixel coordinates.
    pub fn setup(corners: [Point; 3], size: ImageSize) -> Result<Self, TriangleCull> {
        if size.is_empty() {
            return Err(TriangleCull::OffImage);
        }
        let mut v = [[0i128; 2]; 3];
        for (dst, p) in v.iter_mut().zip(corners.iter()) {
            *dst = [snap(p.x)?, snap(p.y)?];
        }

        let area = edge_function(v[0], v[1], v[2]);
        if area == 0 {
            return Err(TriangleCull::Degenerate);
        }
        if area < 0 {
            v.swap(1, 2);
        }

        let min_x = v.iter().map(|p| p[0]).min().unwrap_or(0);
        let max_x = v.iter().map(|p| p[0]).max().unwrap_or(0);
        let min_y = v.iter().map(|p| p[1]).min().unwrap_or(0);
        let max_y = v.iter().map(|p| p[1]).max().unwrap_or(0);

        let x0 = first_center_at_or_after(min_x).max(0);
        let y0 = first_center_at_or_after(min_y).max(0);
        let x1 = last_center_at_or_before(max_x).min(i128::from(size.width) - 1);
        let y1 = last_center_at_or_before(max_y).min(i128::from(size.height) - 1);
        if x0 > x1 || y0 > y1 {
            return Err(TriangleCull::OffImage);
        }

        Ok(Self {
            edges: [
                Edge::new(v[1], v[2]),
                Edge::new(v[2], v[0]),
                Edge::new(v[0], v[1]),
            ],
            bounds: PixelRect {
                x0: x0 as u32,
                y0: y0 as u32,
                x1: x1 as u32,
                y1: y1 as u32,
            },
        })
    }

    /// Candidate pixels, already intersected with the image.
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    /// Return `true` when the centre of pixel `(x, y)` is covered.
    pub fn covers(&self, x: u32, y: u32) -> bool {
        let p = pixel_center(i128::from(x), i128::from(y));
        self.edges.iter().all(|e| e.eval(p) >= 0)
    }

    /// Blend covered pixels of rows `[band_y0, band_y1)` into `band`.
    ///
    /// `band` holds exactly those rows of a `width`-wide RGB8 image. Returns the number of
    /// pixels written.
    pub fn fill_band(
        &self,
        band: &mut [u8],
        width: u32,
        band_y0: u32,
        band_y1: u32,
        paint: &MeshPaint,
    ) -> u64 {
        let y_start = self.bounds.y0.max(band_y0);
        let y_end = (self.bounds.y1 + 1).min(band_y1);
        if y_start >= y_end {
            return 0;
        }

        let row_stride = width as usize * 3;
        let origin = pixel_center(i128::from(self.bounds.x0), i128::from(y_start));
        let mut row_w = self.edges.map(|e| e.eval(origin));
        let step_x = self.edges.map(|e| e.step_x());
        let step_y = self.edges.map(|e| e.step_y());

        let mut written = 0u64;
        for y in y_start..y_end {
            let row = (y - band_y0) as usize * row_stride;
            let mut w = row_w;
            for x in self.bounds.x0..=self.bounds.x1 {
                if w[0] >= 0 && w[1] >= 0 && w[2] >= 0 {
                    let i = row + x as usize * 3;
                    paint.apply(&mut band[i..i + 3]);
                    written += 1;
                }
                for (wk, s) in w.iter_mut().zip(step_x) {
                    *wk += s;
                }
            }
            for (wk, s) in row_w.iter_mut().zip(step_y) {
                *wk += s;
            }
        }
        written
    }
}

fn snap(v: f64) -> Result<i128, TriangleCull> {
    if !v.is_finite() || v.abs() > GUARD_BAND_PX {
        return Err(TriangleCull::OutOfRange);
    }
    Ok((v * SUBPIXEL as f64).round() as i128)
}

fn pixel_center(x: i128, y: i128) -> [i128; 2] {
    [x * SUBPIXEL + HALF_SUBPIXEL, y * SUBPIXEL + HALF_SUBPIXEL]
}

/// Smallest pixel whose centre is `>= v` (subpixel units).
fn first_center_at_or_after(v: i128) -> i128 {
    -((HALF_SUBPIXEL - v).div_euclid(SUBPIXEL))
}

/// Largest pixel whose centre is `<= v` (subpixel units).
fn last_center_at_or_before(v: i128) -> i128 {
    (v - HALF_SUBPIXEL).div_euclid(SUBPIXEL)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
