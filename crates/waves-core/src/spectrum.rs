//! Spectrum sampling for the bar visualizer.

use serde::{Deserialize, Serialize};

use crate::backend::{AudioGraph, FrameScheduler, TickId};
use crate::error::PlayerError;

/// Number of bars / frequency buckets per frame.
pub const BUCKET_COUNT: usize = 32;
/// Analyser FFT size; yields `FFT_SIZE / 2 == BUCKET_COUNT` bins.
pub const FFT_SIZE: u32 = 64;
/// Smallest bar height (percent) drawn even for silent buckets.
pub const MIN_BAR_PERCENT: f32 = 5.0;

/// One snapshot of per-bucket magnitude, each in `0.0..=100.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectrumFrame(pub [f32; BUCKET_COUNT]);

impl Default for SpectrumFrame {
    fn default() -> Self {
        Self([0.0; BUCKET_COUNT])
    }
}

impl SpectrumFrame {
    pub fn from_bytes(raw: &[u8; BUCKET_COUNT]) -> Self {
        Self(raw.map(normalize))
    }

    /// Bar heights in percent with the visual floor applied.
    pub fn bar_heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().copied().map(bar_height_percent)
    }
}

/// Map an analyser byte (0..=255) to 0..=100.
pub fn normalize(byte: u8) -> f32 {
    f32::from(byte) / 255.0 * 100.0
}

pub fn bar_height_percent(value: f32) -> f32 {
    value.max(MIN_BAR_PERCENT)
}

#[derive(Debug)]
enum GraphSlot<G> {
    NotBuilt,
    Ready(G),
    Unavailable,
}

/// Owns the session's single analysis graph and its tick loop.
///
/// At most one tick is pending at any time, and no frame is produced unless
/// the caller says playback is active.
#[derive(Debug)]
pub struct SpectrumSampler<G> {
    graph: GraphSlot<G>,
    pending: Option<TickId>,
    frame: SpectrumFrame,
    raw: [u8; BUCKET_COUNT],
}

impl<G> Default for SpectrumSampler<G> {
    fn default() -> Self {
        Self {
            graph: GraphSlot::NotBuilt,
            pending: None,
            frame: SpectrumFrame::default(),
            raw: [0; BUCKET_COUNT],
        }
    }
}

impl<G: AudioGraph> SpectrumSampler<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph on first use. A failed build is remembered and never
    /// retried. Returns whether a graph is available.
    pub fn ensure_graph(&mut self, build: impl FnOnce() -> Result<G, PlayerError>) -> bool {
        if let GraphSlot::NotBuilt = self.graph {
            self.graph = match build() {
                Ok(graph) => {
                    tracing::info!("Audio analysis graph ready");
                    GraphSlot::Ready(graph)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Continuing without visualizer");
                    GraphSlot::Unavailable
                }
            };
        }
        self.is_available()
    }

    pub fn is_available(&self) -> bool {
        matches!(self.graph, GraphSlot::Ready(_))
    }

    pub fn graph_mut(&mut self) -> Option<&mut G> {
        match &mut self.graph {
            GraphSlot::Ready(graph) => Some(graph),
            _ => None,
        }
    }

    pub fn pending_tick(&self) -> Option<TickId> {
        self.pending
    }

    pub fn frame(&self) -> &SpectrumFrame {
        &self.frame
    }

    /// Schedule the next tick unless one is already pending.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.pending.is_some() || !self.is_available() {
            return;
        }
        match scheduler.request_tick() {
            Ok(id) => self.pending = Some(id),
            Err(e) => tracing::warn!(error = %e, "Could not schedule spectrum tick"),
        }
    }

    /// Cancel the pending tick, if any.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel_tick(id);
        }
    }

    /// Handle a delivered tick. Produces a frame and schedules the next tick
    /// only while `playing`.
    pub fn on_tick(
        &mut self,
        id: TickId,
        playing: bool,
        scheduler: &mut impl FrameScheduler,
    ) -> Option<&SpectrumFrame> {
        if self.pending != Some(id) {
            tracing::trace!(?id, "Ignoring stale tick");
            return None;
        }
        self.pending = None;
        if !playing {
            return None;
        }
        let GraphSlot::Ready(graph) = &mut self.graph else {
            return None;
        };
        graph.read_frequency_data(&mut self.raw);
        self.frame = SpectrumFrame::from_bytes(&self.raw);
        self.start(scheduler);
        Some(&self.frame)
    }

    pub fn clear_frame(&mut self) {
        self.frame = SpectrumFrame::default();
    }

    /// Stop the loop and close the graph.
    pub fn teardown(&mut self, scheduler: &mut impl FrameScheduler) {
        self.stop(scheduler);
        if let GraphSlot::Ready(graph) = &mut self.graph {
            graph.close();
        }
        self.graph = GraphSlot::Unavailable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestGraph, TestScheduler};

    fn ready_sampler() -> SpectrumSampler<TestGraph> {
        let mut sampler = SpectrumSampler::new();
        assert!(sampler.ensure_graph(|| Ok(TestGraph::with_level(255))));
        sampler
    }

    #[test]
    fn normalizes_bytes_to_percent() {
        assert_eq!(normalize(0), 0.0);
        assert_eq!(normalize(255), 100.0);
        assert!((normalize(51) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn bar_heights_have_a_floor() {
        let mut frame = SpectrumFrame::default();
        frame.0[1] = 42.0;
        let heights: Vec<f32> = frame.bar_heights().take(2).collect();
        assert_eq!(heights, [MIN_BAR_PERCENT, 42.0]);
    }

    #[test]
    fn graph_failure_is_remembered() {
        let mut sampler: SpectrumSampler<TestGraph> = SpectrumSampler::new();
        let failed = sampler.ensure_graph(|| {
            Err(PlayerError::VisualizerUnavailable("no audio context".into()))
        });
        assert!(!failed);
        assert!(!sampler.ensure_graph(|| Ok(TestGraph::with_level(1))));
        assert!(sampler.graph_mut().is_none());
    }

    #[test]
    fn start_keeps_a_single_pending_tick() {
        let mut sampler = ready_sampler();
        let mut scheduler = TestScheduler::default();
        sampler.start(&mut scheduler);
        sampler.start(&mut scheduler);
        assert_eq!(scheduler.requested, 1);
        assert_eq!(scheduler.pending.len(), 1);
    }

    #[test]
    fn tick_while_playing_produces_frame_and_reschedules() {
        let mut sampler = ready_sampler();
        let mut scheduler = TestScheduler::default();
        sampler.start(&mut scheduler);
        let id = scheduler.fire().unwrap();

        let frame = sampler.on_tick(id, true, &mut scheduler).copied();
        assert_eq!(frame.map(|f| f.0[0]), Some(100.0));
        assert_eq!(scheduler.pending.len(), 1);
    }

    #[test]
    fn tick_while_paused_ends_the_loop() {
        let mut sampler = ready_sampler();
        let mut scheduler = TestScheduler::default();
        sampler.start(&mut scheduler);
        let id = scheduler.fire().unwrap();

        assert!(sampler.on_tick(id, false, &mut scheduler).is_none());
        assert!(sampler.pending_tick().is_none());
        assert!(scheduler.pending.is_empty());
        assert_eq!(sampler.frame(), &SpectrumFrame::default());
    }

    #[test]
    fn stop_is_idempotent_and_stale_ticks_are_ignored() {
        let mut sampler = ready_sampler();
        let mut scheduler = TestScheduler::default();
        sampler.start(&mut scheduler);
        let id = sampler.pending_tick().unwrap();
        sampler.stop(&mut scheduler);
        sampler.stop(&mut scheduler);
        assert_eq!(scheduler.cancelled, vec![id]);
        assert!(sampler.on_tick(id, true, &mut scheduler).is_none());
    }
}
