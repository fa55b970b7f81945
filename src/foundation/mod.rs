//! Core types shared by every other module.

/// Canvas sizes, normalized points, frames and pixel helpers.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Session configuration.
pub mod config;
pub(crate) mod math;
