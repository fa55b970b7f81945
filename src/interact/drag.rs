use crate::{
    foundation::core::{CanvasSize, NormPoint, Point},
    interact::hit::{hit_test, to_normalized},
    settings::{model::LampPatch, store::SettingsStore},
};

/// Drag state. A session only exists between a press on the lamp and the next release/leave.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Dragging; `anchor` is the last pointer position a delta was taken from.
    Dragging {
        /// Last pointer position in canvas pixels.
        anchor: Point,
    },
}

/// Turns pointer press/move/release into lamp position updates.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// A controller in [`DragState::Idle`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag session is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer pressed at `p`. Starts a drag iff `p` hits the current lamp box.
    pub fn press(&mut self, p: Point, store: &SettingsStore, canvas: CanvasSize) -> bool {
        if hit_test(p, store.current(), canvas) {
            tracing::debug!(x = p.x, y = p.y, "drag start");
            self.state = DragState::Dragging { anchor: p };
            true
        } else {
            false
        }
    }

    /// Pointer moved to `p`.
    ///
    /// While dragging, the pixel delta since the last anchor is converted to percent and added to
    /// the lamp position through [`SettingsStore::apply`] (one history entry per move). The anchor
    /// then moves to `p`, so deltas are incremental. A non-finite `p` leaves the anchor in place.
    /// Returns whether settings changed.
    pub fn move_to(&mut self, p: Point, store: &mut SettingsStore, canvas: CanvasSize) -> bool {
        let DragState::Dragging { anchor } = self.state else {
            return false;
        };

        let from = to_normalized(anchor, canvas);
        let to = to_normalized(p, canvas);
        let pos = store.current().position;
        let next = NormPoint::new(pos.x + (to.x - from.x), pos.y + (to.y - from.y));

        // Clamping happens in the store; a non-finite axis keeps its previous value there.
        store.apply(&LampPatch::position(next));
        if p.x.is_finite() && p.y.is_finite() {
            self.state = DragState::Dragging { anchor: p };
        }
        true
    }

    /// Pointer released. Always ends the drag.
    pub fn release(&mut self) {
        if self.is_dragging() {
            tracing::debug!("drag end");
        }
        self.state = DragState::Idle;
    }

    /// Pointer left the canvas. Same as [`release`](Self::release).
    pub fn leave(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
