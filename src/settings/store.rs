use crate::settings::model::{LampAction, LampPatch, LampSettings};

/// Current lamp settings plus a linear undo/redo history.
///
/// The history is an append-only run of snapshots with a cursor. Undo and redo only move the
/// cursor; a new edit drops everything after the cursor before appending. The current settings
/// are always `history[index]`, and `index < history.len()` always holds.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    history: Vec<LampSettings>,
    index: usize,
    defaults: LampSettings,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(LampSettings::default())
    }
}

impl SettingsStore {
    /// A store whose history holds only `defaults`. [`reset`](Self::reset) returns here.
    pub fn new(defaults: LampSettings) -> Self {
        Self {
            history: vec![defaults.clone()],
            index: 0,
            defaults,
        }
    }

    /// A store whose history starts at `initial`. [`reset`](Self::reset) still returns to
    /// [`LampSettings::default`].
    pub fn starting_at(initial: LampSettings) -> Self {
        Self {
            history: vec![initial],
            index: 0,
            defaults: LampSettings::default(),
        }
    }

    /// Current settings.
    pub fn current(&self) -> &LampSettings {
        &self.history[self.index]
    }

    /// Merge `patch` into the current settings, clamp, and push the result as a new snapshot.
    ///
    /// Any redo tail is discarded first. Returns the new current settings.
    pub fn apply(&mut self, patch: &LampPatch) -> &LampSettings {
        let next = patch.merge_into(self.current());
        let dropped = self.history.len() - (self.index + 1);
        if dropped > 0 {
            tracing::debug!(dropped, "edit truncates redo tail");
        }
        self.history.truncate(self.index + 1);
        self.history.push(next);
        self.index += 1;
        self.current()
    }

    /// Apply a discrete action (one history entry).
    pub fn apply_action(&mut self, action: &LampAction) -> &LampSettings {
        let patch = action.to_patch(self.current());
        self.apply(&patch)
    }

    /// Step back one snapshot. At the oldest snapshot this is a no-op.
    pub fn undo(&mut self) -> &LampSettings {
        if self.index > 0 {
            self.index -= 1;
        }
        self.current()
    }

    /// Step forward one snapshot. At the newest snapshot this is a no-op.
    pub fn redo(&mut self) -> &LampSettings {
        if self.index + 1 < self.history.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Back to the defaults with a single-entry history.
    pub fn reset(&mut self) -> &LampSettings {
        self.history.clear();
        self.history.push(self.defaults.clone());
        self.index = 0;
        self.current()
    }

    /// Whether [`undo`](Self::undo) would move.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether [`redo`](Self::redo) would move.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.history.len()
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Always `false`: the history holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Cursor into the history.
    pub fn index(&self) -> usize {
        self.index
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[LampSettings] {
        &self.history
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/store.rs"]
mod tests;
