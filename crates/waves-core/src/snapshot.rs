//! Read-only view of a session for render surfaces.

use serde::{Deserialize, Serialize};

use crate::clock::ClockState;
use crate::media::{MediaId, MediaKind};
use crate::spectrum::SpectrumFrame;
use crate::transport::TransportPhase;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    pub id: MediaId,
    pub name: String,
    pub kind: MediaKind,
}

/// Everything a render surface needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub entries: Vec<EntryView>,
    pub current_index: Option<usize>,
    pub phase: TransportPhase,
    pub is_playing: bool,
    pub clock: ClockState,
    pub volume: f64,
    pub spectrum: SpectrumFrame,
    pub visualizer_available: bool,
}

impl PlayerSnapshot {
    pub fn current(&self) -> Option<&EntryView> {
        self.current_index.and_then(|i| self.entries.get(i))
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.current_index == Some(index)
    }

    /// Serialize for surfaces living outside the Rust side (JS, devtools).
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
