//! Transport state machine: which entry is current and whether it plays.
//!
//! The transport never holds entries itself. Every operation takes the
//! current library length, and library mutations are reported through
//! [`Transport::entries_added`] and [`Transport::entry_removed`] so the
//! selection is re-validated before anything reads it again.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Coarse transport phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportPhase {
    /// No selection (library empty or nothing chosen yet).
    #[default]
    Empty,
    Paused,
    Playing,
}

/// What a removal did to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalEffect {
    /// The current entry was removed; playback stopped.
    CurrentRemoved,
    /// An earlier entry was removed; the selection shifted down by one.
    Shifted,
    Unchanged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transport {
    current_index: Option<usize>,
    is_playing: bool,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn phase(&self) -> TransportPhase {
        match (self.current_index, self.is_playing) {
            (None, _) => TransportPhase::Empty,
            (Some(_), false) => TransportPhase::Paused,
            (Some(_), true) => TransportPhase::Playing,
        }
    }

    /// Select an entry without touching the playing flag.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidSelection`] when `index >= len`; the
    /// state is left as it was.
    pub fn select(&mut self, index: usize, len: usize) -> Result<(), PlayerError> {
        if index >= len {
            return Err(PlayerError::InvalidSelection { index, len });
        }
        self.current_index = Some(index);
        Ok(())
    }

    /// Set the playing flag. Ignored while nothing is selected.
    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing && self.current_index.is_some();
    }

    /// Flip the playing flag. Returns `false` (no-op) on an empty library.
    pub fn toggle(&mut self, len: usize) -> bool {
        if len == 0 || self.current_index.is_none() {
            return false;
        }
        self.is_playing = !self.is_playing;
        true
    }

    /// Advance with wraparound. Returns `false` on an empty library.
    pub fn next(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        self.current_index = Some(match self.current_index {
            Some(index) => (index + 1) % len,
            None => 0,
        });
        true
    }

    /// Step back with wraparound. Returns `false` on an empty library.
    pub fn previous(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        self.current_index = Some(match self.current_index {
            Some(index) => (index + len - 1) % len,
            None => 0,
        });
        true
    }

    /// Natural end of the current media: same as [`Transport::next`].
    pub fn track_ended(&mut self, len: usize) -> bool {
        self.next(len)
    }

    /// Entries were appended. Auto-selects the first entry when the library
    /// was empty before; never starts playback.
    pub fn entries_added(&mut self, previous_len: usize, len: usize) {
        if previous_len == 0 && len > 0 && self.current_index.is_none() {
            self.current_index = Some(0);
        }
    }

    /// The entry at `removed` is gone and `len` entries remain.
    pub fn entry_removed(&mut self, removed: usize, len: usize) -> RemovalEffect {
        let Some(current) = self.current_index else {
            return RemovalEffect::Unchanged;
        };
        let effect = if removed == current {
            self.is_playing = false;
            self.current_index = if len > 0 { Some(0) } else { None };
            RemovalEffect::CurrentRemoved
        } else if removed < current {
            self.current_index = Some(current - 1);
            RemovalEffect::Shifted
        } else {
            RemovalEffect::Unchanged
        };
        debug_assert!(self.current_index.is_none_or(|i| i < len));
        effect
    }

    /// Back to the neutral state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
