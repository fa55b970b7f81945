//! Pointer interaction: hit testing and dragging.

/// Drag state machine.
pub mod drag;
/// Lamp hit box.
pub mod hit;
