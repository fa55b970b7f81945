use std::{path::PathBuf, sync::Arc};

use crate::foundation::{
    error::{LampError, LampResult},
    math::Fnv1a64,
};

/// Number of bundled lamp sprites (selectable as presets 1..=3).
pub const LAMP_PRESET_COUNT: u8 = 3;

/// One of the bundled lamp sprites, resolved to `lamps/<n>.png` under the assets root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LampPreset(u8);

impl LampPreset {
    /// Select a preset by its 1-based index.
    pub fn from_index(index: u8) -> LampResult<Self> {
        if (1..=LAMP_PRESET_COUNT).contains(&index) {
            Ok(Self(index))
        } else {
            Err(LampError::validation(format!(
                "lamp preset must be in 1..={LAMP_PRESET_COUNT}, got {index}"
            )))
        }
    }

    /// 1-based index.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Path relative to the assets root.
    pub fn rel_path(self) -> String {
        format!("lamps/{}.png", self.0)
    }
}

/// Where an image comes from. Decoding happens later, through an
/// [`ImageLoader`](crate::ImageLoader).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on disk; relative paths resolve against the loader's root.
    File(PathBuf),
    /// A bundled lamp sprite.
    Preset(LampPreset),
    /// An accepted upload held in memory.
    Memory {
        /// Display name of the uploaded file.
        name: String,
        /// Raw encoded bytes.
        bytes: Arc<[u8]>,
    },
}

impl ImageSource {
    /// Stable key identifying the source, used to cache decoded rasters.
    pub fn cache_key(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        match self {
            Self::File(p) => {
                h.write_u8(0);
                h.write_bytes(p.to_string_lossy().as_bytes());
            }
            Self::Preset(p) => {
                h.write_u8(1);
                h.write_u8(p.index());
            }
            Self::Memory { name, bytes } => {
                h.write_u8(2);
                h.write_bytes(name.as_bytes());
                h.write_u8(0);
                h.write_bytes(bytes);
            }
        }
        h.finish()
    }

    /// Short human-readable description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::File(p) => p.display().to_string(),
            Self::Preset(p) => format!("preset lamp {}", p.index()),
            Self::Memory { name, bytes } => format!("upload '{name}' ({} bytes)", bytes.len()),
        }
    }
}

/// Gate an upload on its MIME type.
///
/// Anything whose type starts with `image` becomes an in-memory source; everything else is
/// ignored and yields `None` with no further effect.
pub fn accept_upload(mime: &str, name: &str, bytes: impl Into<Arc<[u8]>>) -> Option<ImageSource> {
    if !mime.starts_with("image") {
        tracing::debug!(mime, name, "ignoring non-image upload");
        return None;
    }
    Some(ImageSource::Memory {
        name: name.to_owned(),
        bytes: bytes.into(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
