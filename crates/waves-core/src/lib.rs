//! Core of the WAVES media player.
//!
//! A [`PlayerSession`] owns the playlist ([`Library`]), the [`Transport`]
//! state machine, the playback clock and the spectrum sampler, and keeps a
//! single platform media element (behind [`MediaBackend`]) in step with them.
//! Platform callbacks are fed in as [`MediaEvent`]s and user actions as
//! [`PlayerCommand`]s; render surfaces read a [`PlayerSnapshot`].

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod ingest;
pub mod library;
pub mod media;
pub mod session;
pub mod snapshot;
pub mod spectrum;
pub mod transport;

#[cfg(test)]
mod testing;

pub use backend::{AudioGraph, FrameScheduler, MediaBackend, TickId};
pub use clock::{format_time, ClockState};
pub use config::PlayerConfig;
pub use error::{ConfigError, PlayerError};
pub use ingest::{IngestPolicy, PickedFile};
pub use library::Library;
pub use media::{MediaEntry, MediaId, MediaKind};
pub use session::{MediaEvent, PlayerCommand, PlayerSession};
pub use snapshot::{EntryView, PlayerSnapshot};
pub use spectrum::{bar_height_percent, SpectrumFrame, BUCKET_COUNT, MIN_BAR_PERCENT};
pub use transport::{Transport, TransportPhase};
