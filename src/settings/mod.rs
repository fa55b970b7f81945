//! Lamp settings and their undo/redo history.

/// Settings values, patches and actions.
pub mod model;
/// Snapshot history with undo/redo.
pub mod store;
