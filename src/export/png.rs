use image::ImageEncoder as _;

use crate::foundation::{
    core::FrameRGBA,
    error::{LampError, LampResult},
};

/// File name used for downloads and shares.
pub const EXPORT_FILE_NAME: &str = "lamp-design.png";
/// MIME type of exported images.
pub const PNG_MIME: &str = "image/png";

/// Encode `frame` as an RGBA PNG. Premultiplied frames are converted to straight alpha first.
pub fn encode_png(frame: &FrameRGBA) -> LampResult<Vec<u8>> {
    if frame.width == 0 || frame.height == 0 {
        return Err(LampError::encode("cannot encode an empty frame"));
    }
    let rgba = frame.to_straight_rgba8();
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            &rgba,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| LampError::encode(format!("png encode: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
