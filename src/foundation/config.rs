use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::loader::DEFAULT_IMAGE_CACHE_CAPACITY,
    foundation::{
        core::CanvasSize,
        error::{LampError, LampResult},
    },
};

/// Environment variable overriding [`SessionConfig::export_scale`].
pub const ENV_EXPORT_SCALE: &str = "LAMPVIZ_EXPORT_SCALE";
/// Environment variable overriding [`SessionConfig::device_scale`].
pub const ENV_DEVICE_SCALE: &str = "LAMPVIZ_DEVICE_SCALE";
/// Environment variable overriding [`SessionConfig::image_cache_capacity`].
pub const ENV_IMAGE_CACHE_CAPACITY: &str = "LAMPVIZ_IMAGE_CACHE_CAPACITY";

/// Session-wide knobs: canvas size, scales, where preset lamps live and placeholder styling.
///
/// Loaded from JSON; every field has a default so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// On-screen canvas size in CSS pixels.
    pub canvas: CanvasSize,
    /// Device pixel ratio applied to on-screen renders.
    pub device_scale: f64,
    /// Scale applied to export renders.
    pub export_scale: f64,
    /// Root directory for preset lamp sprites (`lamps/<n>.png`) and relative image paths.
    pub assets_root: PathBuf,
    /// Font file used for the "no background" placeholder text. Without one, only the fill is drawn.
    pub placeholder_font: Option<PathBuf>,
    /// Initial theme.
    pub dark_mode: bool,
    /// How many decoded images the session keeps cached.
    pub image_cache_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::new(896, 512),
            device_scale: 1.0,
            export_scale: 2.0,
            assets_root: PathBuf::from("."),
            placeholder_font: None,
            dark_mode: false,
            image_cache_capacity: DEFAULT_IMAGE_CACHE_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON text and validate it.
    pub fn from_json_str(s: &str) -> LampResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| LampError::validation(format!("invalid session config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a config file, then apply environment overrides.
    pub fn load(path: &Path) -> LampResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read session config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if let Some(parent) = path.parent()
            && cfg.assets_root.is_relative()
        {
            cfg.assets_root = parent.join(&cfg.assets_root);
        }
        Ok(cfg.with_env_overrides())
    }

    /// Apply `LAMPVIZ_*` overrides. Unparseable or non-positive values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_positive_f64(ENV_EXPORT_SCALE) {
            self.export_scale = v;
        }
        if let Some(v) = env_positive_f64(ENV_DEVICE_SCALE) {
            self.device_scale = v;
        }
        if let Some(n) = std::env::var(ENV_IMAGE_CACHE_CAPACITY)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.image_cache_capacity = n;
        }
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> LampResult<()> {
        if self.canvas.is_empty() {
            return Err(LampError::validation("canvas width and height must be > 0"));
        }
        if self.image_cache_capacity == 0 {
            return Err(LampError::validation("image_cache_capacity must be > 0"));
        }
        for (name, v) in [
            ("device_scale", self.device_scale),
            ("export_scale", self.export_scale),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(LampError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

fn env_positive_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
