/// Blend one straight-alpha channel: `round(fg*alpha + bg*(1-alpha))`, clamped to `[0,255]`.
///
/// Rounding is half away from zero (`f64::round`). `alpha` must already be in `[0,1]`.
pub(crate) fn blend_channel(fg: u8, bg: u8, alpha: f64) -> u8 {
    let v = f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha);
    v.round().clamp(0.0, 255.0) as u8
}

/// Blend a straight RGB color over an RGB pixel with [`blend_channel`].
pub(crate) fn blend_rgb(fg: [u8; 3], bg: [u8; 3], alpha: f64) -> [u8; 3] {
    [
        blend_channel(fg[0], bg[0], alpha),
        blend_channel(fg[1], bg[1], alpha),
        blend_channel(fg[2], bg[2], alpha),
    ]
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Premultiplied source-over for RGBA8.
pub(crate) fn over_premul(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    std::array::from_fn(|i| src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv)))
}

/// Convert straight RGB plus an opacity in `[0,1]` into premultiplied RGBA8.
pub(crate) fn premul_rgba(rgb: [u8; 3], alpha: f64) -> [u8; 4] {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u16;
    [
        mul_div255_u8(u16::from(rgb[0]), a),
        mul_div255_u8(u16::from(rgb[1]), a),
        mul_div255_u8(u16::from(rgb[2]), a),
        a as u8,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
