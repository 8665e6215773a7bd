//! Error types for the player core.

use thiserror::Error;

use crate::media::MediaId;

/// Errors reported by player operations.
///
/// None of these are fatal. Callers either surface them (an out of range
/// selection) or log and carry on (a rejected `play()`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("Selection {index} is out of range for a library of {len} entries")]
    InvalidSelection { index: usize, len: usize },

    #[error("No library entry with id {0}")]
    UnknownEntry(MediaId),

    #[error("No media is selected")]
    NoActiveMedia,

    #[error("Duration of the active media is not known yet")]
    UnknownDuration,

    #[error("Seek fraction {0} is not a number in 0..=1")]
    InvalidSeek(f64),

    #[error("Playback did not start: {0}")]
    PlaybackStart(String),

    #[error("Visualizer unavailable: {0}")]
    VisualizerUnavailable(String),

    #[error("Audio context could not be resumed: {0}")]
    ResumeFailed(String),

    #[error("Unsupported media type '{mime}' for {name}")]
    UnsupportedMedia { name: String, mime: String },
}

/// Errors from loading a [`PlayerConfig`](crate::config::PlayerConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid player configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Initial volume {0} is outside 0.0..=1.0")]
    Volume(f64),

    #[error("Smoothing constant {0} is outside 0.0..=1.0")]
    Smoothing(f64),
}
