use std::sync::Arc;

use crate::foundation::{
    core::premultiply_rgba8_in_place,
    error::{LampError, LampResult},
};

/// Largest accepted image side; rasters are sampled from `u16`-sized surfaces.
pub const MAX_IMAGE_DIM: u32 = u16::MAX as u32;

/// A decoded image, ready to be composited.
///
/// Pixels are premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Raster {
    /// Wrap already-premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> LampResult<Self> {
        if width == 0 || height == 0 {
            return Err(LampError::decode("image has zero width or height"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(LampError::decode("raster byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build from straight-alpha RGBA pixels.
    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> LampResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// Height divided by width; the sprite keeps this ratio when scaled to the lamp box.
    pub fn aspect(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }
}

/// Decode any format the `image` crate recognizes into a premultiplied [`Raster`].
pub fn decode_image(bytes: &[u8]) -> LampResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LampError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width > MAX_IMAGE_DIM || height > MAX_IMAGE_DIM {
        return Err(LampError::decode(format!(
            "image {width}x{height} exceeds {MAX_IMAGE_DIM} pixels per side"
        )));
    }
    Raster::from_straight(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
