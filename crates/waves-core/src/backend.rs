//! Seams between the player core and the platform that actually plays media.
//!
//! The browser adapter implements these with an `HTMLMediaElement`, a Web
//! Audio analyser and `requestAnimationFrame`. Tests use in-memory fakes.

use crate::error::PlayerError;
use crate::media::MediaKind;

/// The single "now playing" element.
pub trait MediaBackend {
    /// Handle type owned by library entries.
    type Source;
    /// Analysis graph attached to this element.
    type Graph: AudioGraph;

    /// Point the element at a new source. Playback position restarts at 0.
    fn load(&mut self, source: &Self::Source, kind: MediaKind);

    /// Detach the current source, if any.
    fn unload(&mut self);

    /// Ask the element to start playing.
    ///
    /// Platforms that start asynchronously report later failures as
    /// [`MediaEvent::PlaybackRejected`](crate::session::MediaEvent).
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::PlaybackStart`] when the request is refused
    /// outright.
    fn play(&mut self) -> Result<(), PlayerError>;

    fn pause(&mut self);

    /// Jump to `seconds` from the start of the media.
    fn seek(&mut self, seconds: f64);

    /// Volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f64);

    /// Build the analysis graph for this element.
    ///
    /// Called at most once per session.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::VisualizerUnavailable`] when the platform
    /// cannot build it.
    fn create_graph(&mut self, fft_size: u32, smoothing: f64) -> Result<Self::Graph, PlayerError>;
}

/// Frequency analysis attached to the media element.
pub trait AudioGraph {
    fn is_suspended(&self) -> bool;

    /// Resume a suspended context (autoplay policy).
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::ResumeFailed`] if the request is refused.
    fn resume(&mut self) -> Result<(), PlayerError>;

    /// Fill `out` with byte magnitudes (0..=255), one per frequency bin.
    fn read_frequency_data(&mut self, out: &mut [u8]);

    /// Release platform resources. Called once, on session teardown.
    fn close(&mut self) {}
}

/// Identifier of a scheduled tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickId(pub i32);

/// Per-frame callback scheduling.
pub trait FrameScheduler {
    /// Request one tick. The platform later delivers it as
    /// [`MediaEvent::Tick`](crate::session::MediaEvent) with the returned id.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::VisualizerUnavailable`] if scheduling failed.
    fn request_tick(&mut self) -> Result<TickId, PlayerError>;

    /// Cancel a pending tick. Cancelling an already fired or cancelled tick
    /// does nothing.
    fn cancel_tick(&mut self, id: TickId);
}
