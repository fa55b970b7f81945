use crate::foundation::error::{LampError, LampResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Pixel dimensions of a drawing surface.
///
/// Pointer coordinates, hit boxes and the lamp layout are all expressed against this size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Construct a canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Whether either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Device-scaled size (`round(dim * scale)`), e.g. 2x for export.
    pub fn scaled(self, scale: f64) -> LampResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(LampError::validation("scale must be finite and > 0"));
        }
        let sw = (self.w() * scale).round();
        let sh = (self.h() * scale).round();
        if sw > f64::from(u32::MAX) || sh > f64::from(u32::MAX) {
            return Err(LampError::validation("scaled canvas size overflows u32"));
        }
        Ok(Self {
            width: sw as u32,
            height: sh as u32,
        })
    }
}

/// A point in normalized scene coordinates: percent (0..=100) of canvas width / height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormPoint {
    /// Percent of canvas width.
    pub x: f64,
    /// Percent of canvas height.
    pub y: f64,
}

impl NormPoint {
    /// Construct a normalized point (not clamped).
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates to `[0, 100]`.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_or(self.x, 0.0, 100.0, 0.0),
            y: clamp_or(self.y, 0.0, 100.0, 0.0),
        }
    }

    /// Pixel position of this point on `canvas`.
    pub fn to_pixels(self, canvas: CanvasSize) -> Point {
        Point::new(self.x / 100.0 * canvas.w(), self.y / 100.0 * canvas.h())
    }
}

/// Clamp `v` to `[lo, hi]`; non-finite input yields `fallback`.
pub fn clamp_or(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(lo, hi) } else { fallback }
}

/// Wrap degrees into `[0, 360)`; non-finite input yields `fallback`.
pub fn wrap_degrees(v: f64, fallback: f64) -> f64 {
    if !v.is_finite() {
        return fallback;
    }
    let w = v.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if w >= 360.0 { 0.0 } else { w }
}

/// A rendered raster as RGBA8 pixels.
///
/// Frames coming out of the renderer are **premultiplied alpha**; the flag makes that explicit at
/// API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// A fully transparent premultiplied frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            premultiplied: true,
        }
    }

    /// The four channel bytes at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels, as expected by PNG encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[0..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
