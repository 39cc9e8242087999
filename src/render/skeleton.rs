use serde::Serialize;

use crate::render::surface::RenderSurface;
use crate::scene::config::OverlayConfig;
use crate::scene::skeleton::{Joint, SkeletonFrame};

/// How skeletons are drawn. Everything is fully opaque.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonStyle {
    /// Segment and marker color.
    pub color: [u8; 3],
    /// Segment thickness in pixels; 0 disables segments.
    pub line_thickness: u32,
    /// Marker radius in pixels; 0 disables markers.
    pub joint_radius: u32,
    /// Joints at or below this confidence are skipped.
    pub confidence_threshold: f64,
}

impl SkeletonStyle {
    /// Style described by a renderer config.
    pub fn from_config(cfg: &OverlayConfig) -> Self {
        Self {
            color: cfg.skeleton_color.to_array(),
            line_thickness: cfg.line_thickness,
            joint_radius: cfg.joint_radius,
            confidence_threshold: cfg.confidence_threshold,
        }
    }
}

/// What [`draw_skeleton`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SkeletonStats {
    /// Segments drawn.
    pub segments_drawn: usize,
    /// Segments skipped for a bad index, low confidence or an off-image joint.
    pub segments_skipped: usize,
    /// Joint markers drawn.
    pub joints_drawn: usize,
}

/// Draw segments, then joint markers, over whatever is already on `surface`.
pub fn draw_skeleton(
    surface: &mut RenderSurface,
    skeleton: &SkeletonFrame,
    style: &SkeletonStyle,
) -> SkeletonStats {
    let mut stats = SkeletonStats::default();
    let anchors: Vec<Option<(i64, i64)>> = skeleton
        .joints
        .iter()
        .map(|j| joint_pixel(surface, j, style.confidence_threshold))
        .collect();

    for &(a, b) in &skeleton.connections {
        let ends = (
            anchors.get(a).copied().flatten(),
            anchors.get(b).copied().flatten(),
        );
        match ends {
            (Some(pa), Some(pb)) if style.line_thickness > 0 => {
                draw_line(surface, pa, pb, style.color, style.line_thickness);
                stats.segments_drawn += 1;
            }
            _ => stats.segments_skipped += 1,
        }
    }

    if style.joint_radius > 0 {
        for anchor in anchors.iter().flatten() {
            draw_disc(surface, *anchor, style.joint_radius, style.color);
            stats.joints_drawn += 1;
        }
    }
    stats
}

/// Pixel holding the joint, if the joint is confident, finite and on the image.
fn joint_pixel(surface: &RenderSurface, joint: &Joint, threshold: f64) -> Option<(i64, i64)> {
    if !(joint.confidence > threshold) || !joint.x.is_finite() || !joint.y.is_finite() {
        return None;
    }
    let (x, y) = (joint.x.floor(), joint.y.floor());
    if x.abs() > i64::MAX as f64 / 2.0 || y.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    let (x, y) = (x as i64, y as i64);
    surface.size().contains(x, y).then_some((x, y))
}

fn draw_line(
    surface: &mut RenderSurface,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; 3],
    thickness: u32,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let radius = ((i64::from(thickness.max(1)) - 1) / 2).min(max_reach(surface));

    loop {
        for oy in -radius..=radius {
            let span = radius - oy.abs();
            for ox in -span..=span {
                surface.put_clipped(x0 + ox, y0 + oy, color);
            }
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Filled disc, visiting only rows and columns on the surface.
fn draw_disc(surface: &mut RenderSurface, center: (i64, i64), radius: u32, color: [u8; 3]) {
    let size = surface.size();
    let (cx, cy) = center;
    let r = i64::from(radius).min(max_reach(surface));
    let rr = r * r;
    let y_lo = (cy - r).max(0);
    let y_hi = (cy + r).min(i64::from(size.height) - 1);
    let x_lo = (cx - r).max(0);
    let x_hi = (cx + r).min(i64::from(size.width) - 1);
    for y in y_lo..=y_hi {
        let dy = y - cy;
        for x in x_lo..=x_hi {
            let dx = x - cx;
            if dx * dx + dy * dy <= rr {
                surface.put_clipped(x, y, color);
            }
        }
    }
}

/// No pixel of the surface is farther than this from an on-surface anchor.
fn max_reach(surface: &RenderSurface) -> i64 {
    let size = surface.size();
    i64::from(size.width) + i64::from(size.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/skeleton.rs"]
mod tests;
