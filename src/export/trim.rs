use rayon::prelude::*;

use crate::foundation::{
    core::FrameRGBA,
    error::{LampError, LampResult},
};

/// Inclusive pixel bounds of the visible content in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentBounds {
    /// Leftmost column with a visible pixel.
    pub min_x: u32,
    /// Topmost row with a visible pixel.
    pub min_y: u32,
    /// Rightmost column with a visible pixel.
    pub max_x: u32,
    /// Bottom row with a visible pixel.
    pub max_y: u32,
}

impl ContentBounds {
    /// `max_x - min_x + 1`.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// `max_y - min_y + 1`.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Smallest box containing every pixel with non-zero alpha, or `None` if there is none.
pub fn content_bounds(frame: &FrameRGBA) -> Option<ContentBounds> {
    let row_len = frame.width as usize * 4;
    if row_len == 0 || frame.height == 0 {
        return None;
    }

    frame
        .data
        .par_chunks_exact(row_len)
        .enumerate()
        .filter_map(|(y, row)| {
            let mut alpha = row.chunks_exact(4).map(|px| px[3]);
            let first = alpha.position(|a| a != 0)?;
            let last = row
                .chunks_exact(4)
                .rposition(|px| px[3] != 0)
                .unwrap_or(first);
            Some(ContentBounds {
                min_x: first as u32,
                min_y: y as u32,
                max_x: last as u32,
                max_y: y as u32,
            })
        })
        .reduce_with(ContentBounds::union)
}

/// Crop `frame` to its visible content.
///
/// The result is exactly the bounding box of all non-transparent pixels: no padding, no
/// rescaling. A frame with no visible pixel is [`LampError::EmptyExport`].
#[tracing::instrument(skip(frame), fields(w = frame.width, h = frame.height))]
pub fn trim(frame: &FrameRGBA) -> LampResult<FrameRGBA> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(LampError::validation(format!(
            "frame byte length {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let bounds = content_bounds(frame).ok_or(LampError::EmptyExport)?;
    let (w, h) = (bounds.width(), bounds.height());
    let src_row = frame.width as usize * 4;
    let dst_row = w as usize * 4;
    let x0 = bounds.min_x as usize * 4;

    let mut data = Vec::with_capacity(dst_row * h as usize);
    for y in bounds.min_y..=bounds.max_y {
        let start = y as usize * src_row + x0;
        data.extend_from_slice(&frame.data[start..start + dst_row]);
    }

    tracing::debug!(w, h, "trimmed export");
    Ok(FrameRGBA {
        width: w,
        height: h,
        data,
        premultiplied: frame.premultiplied,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/trim.rs"]
mod tests;
