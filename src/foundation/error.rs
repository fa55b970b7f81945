/// Convenience result type used across lampviz.
pub type LampResult<T> = Result<T, LampError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Rejected uploads are not represented here: a non-image upload is a silent no-op.
#[derive(thiserror::Error, Debug)]
pub enum LampError {
    /// Invalid user-provided data (config, settings JSON, preset index, colors).
    #[error("validation error: {0}")]
    Validation(String),

    /// The render surface could not be acquired; the render attempt produced nothing.
    #[error("canvas context unavailable: {0}")]
    CanvasContextUnavailable(String),

    /// A background or sprite image could not be read or decoded.
    #[error("image decode failure: {0}")]
    ImageDecode(String),

    /// The export raster had no pixel with non-zero alpha.
    #[error("export is empty: no visible pixels to save")]
    EmptyExport,

    /// The injected share sink has no share capability.
    #[error("sharing is not supported on this device")]
    ShareUnsupported,

    /// PNG encoding of a finished raster failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LampError {
    /// Build a [`LampError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LampError::CanvasContextUnavailable`] value.
    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::CanvasContextUnavailable(msg.into())
    }

    /// Build a [`LampError::ImageDecode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`LampError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Whether the failure should be shown to the user as a message for that one operation.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::EmptyExport | Self::ShareUnsupported)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
