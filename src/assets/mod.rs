//! Image sources, decoding and loading, plus color parsing.

/// Hex colors.
pub mod color;
/// Image decoding into premultiplied rasters.
pub mod decode;
/// The `ImageLoader` seam and its implementations.
pub mod loader;
/// Where images come from: files, presets, uploads.
pub mod source;
