//! Getting a design out: trimming, PNG encoding and sharing.

/// PNG encoding.
pub mod png;
/// Share sinks.
pub mod share;
/// Crop to visible content.
pub mod trim;
