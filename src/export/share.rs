use crate::{
    export::png::{EXPORT_FILE_NAME, PNG_MIME},
    foundation::error::{LampError, LampResult},
};

/// Title offered alongside shared designs.
pub const SHARE_TITLE: &str = "My Lamp Design";
/// Text offered alongside shared designs.
pub const SHARE_TEXT: &str = "Check out my lamp design!";

/// What accompanies shared bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareMetadata {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of the bytes.
    pub mime: String,
    /// Share title.
    pub title: String,
    /// Share message.
    pub text: String,
}

impl Default for ShareMetadata {
    fn default() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_owned(),
            mime: PNG_MIME.to_owned(),
            title: SHARE_TITLE.to_owned(),
            text: SHARE_TEXT.to_owned(),
        }
    }
}

/// Result of handing bytes to a [`ShareSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareStatus {
    /// The platform accepted the share.
    Shared,
    /// The platform has no share capability.
    Unsupported,
}

/// Platform share facility.
pub trait ShareSink {
    /// Offer `bytes` for sharing.
    fn share(&mut self, bytes: &[u8], metadata: &ShareMetadata) -> LampResult<ShareStatus>;
}

/// A platform without sharing.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedShareSink;

impl ShareSink for UnsupportedShareSink {
    fn share(&mut self, _bytes: &[u8], _metadata: &ShareMetadata) -> LampResult<ShareStatus> {
        Ok(ShareStatus::Unsupported)
    }
}

/// Share `png` through `sink`, turning [`ShareStatus::Unsupported`] into
/// [`LampError::ShareUnsupported`].
pub fn share_png(sink: &mut dyn ShareSink, png: &[u8]) -> LampResult<()> {
    match sink.share(png, &ShareMetadata::default())? {
        ShareStatus::Shared => Ok(()),
        ShareStatus::Unsupported => Err(LampError::ShareUnsupported),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/share.rs"]
mod tests;
