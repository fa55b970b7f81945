use crate::foundation::error::{LampError, LampResult};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of one premultiplied pixel onto another.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Source-over of a whole layer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> LampResult<()> {
    check_same_len(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over of one solid premultiplied color onto every pixel of `dst`.
pub fn fill_over_in_place(dst: &mut [u8], color: PremulRgba8) -> LampResult<()> {
    if !dst.len().is_multiple_of(4) {
        return Err(LampError::canvas("fill_over_in_place expects an rgba8 buffer"));
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], color);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` onto `dst` with the "screen" blend: overlaps brighten, never occlude.
///
/// Porter-Duff source-over with the blend applied to unpremultiplied channels:
/// `out_a = sa + da * (1 - sa)`, `out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da`.
pub fn screen_in_place(dst: &mut [u8], src: &[u8]) -> LampResult<()> {
    check_same_len(dst, src, "screen_in_place")?;
    blend_in_place(dst, src, |s, d| s + d - s * d);
    Ok(())
}

fn blend_in_place<F>(dst: &mut [u8], src: &[u8], blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }

        let sa = f32::from(s[3]) / 255.0;
        let da = f32::from(d[3]) / 255.0;
        let inv_sa = 1.0 - sa;
        let out_a = (sa + da * inv_sa).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = f32::from(s[c]) / 255.0;
            let dp = f32::from(d[c]) / 255.0;
            let sc = (sp / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * inv_sa + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out_p * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }
}

/// Premultiply a straight-alpha color.
pub fn premul(rgba: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(rgba[3]);
    [
        mul_div255(u16::from(rgba[0]), a),
        mul_div255(u16::from(rgba[1]), a),
        mul_div255(u16::from(rgba[2]), a),
        rgba[3],
    ]
}

fn check_same_len(dst: &[u8], src: &[u8], what: &str) -> LampResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LampError::canvas(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
