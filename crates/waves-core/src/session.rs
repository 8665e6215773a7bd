//! The player session: one library, one transport, one media element and one
//! analysis graph, kept consistent across every command and media event.

use crate::backend::{AudioGraph, FrameScheduler, MediaBackend, TickId};
use crate::clock::ClockState;
use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::ingest::{build_entries, PickedFile};
use crate::library::Library;
use crate::media::{MediaEntry, MediaId};
use crate::snapshot::{EntryView, PlayerSnapshot};
use crate::spectrum::{SpectrumFrame, SpectrumSampler, FFT_SIZE};
use crate::transport::{RemovalEffect, Transport};

/// User actions coming from a render surface.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerCommand {
    Select(usize),
    /// Playlist click: select and start playing.
    SelectAndPlay(usize),
    TogglePlay,
    Next,
    Previous,
    Stop,
    /// Seek to a fraction (0..=1) of the duration.
    Seek(f64),
    SetVolume(f64),
    Remove(MediaId),
    Clear,
}

/// Inputs from the platform: element events and scheduled ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    TimeUpdate { current_time: f64, duration: f64 },
    /// Natural end of the current media.
    Ended,
    /// An asynchronous `play()` was rejected after the fact.
    PlaybackRejected(String),
    Tick(TickId),
}

pub struct PlayerSession<B: MediaBackend, S: FrameScheduler> {
    config: PlayerConfig,
    library: Library<B::Source>,
    transport: Transport,
    clock: ClockState,
    sampler: SpectrumSampler<B::Graph>,
    volume: f64,
    // Entry currently loaded into the element.
    loaded: Option<MediaId>,
    // Whether the element was last told to play.
    element_playing: bool,
    backend: B,
    scheduler: S,
}

impl<B: MediaBackend, S: FrameScheduler> PlayerSession<B, S> {
    pub fn new(backend: B, scheduler: S, config: PlayerConfig) -> Self {
        Self::with_library(backend, scheduler, config, Library::new())
    }

    pub fn with_library(
        mut backend: B,
        scheduler: S,
        config: PlayerConfig,
        library: Library<B::Source>,
    ) -> Self {
        let volume = config.initial_volume.clamp(0.0, 1.0);
        backend.set_volume(volume);
        let mut session = Self {
            config,
            library,
            transport: Transport::new(),
            clock: ClockState::default(),
            sampler: SpectrumSampler::new(),
            volume,
            loaded: None,
            element_playing: false,
            backend,
            scheduler,
        };
        let len = session.library.len();
        session.transport.entries_added(0, len);
        session.sync_media();
        session
    }

    pub fn library(&self) -> &Library<B::Source> {
        &self.library
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    pub fn spectrum(&self) -> &SpectrumFrame {
        self.sampler.frame()
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn visualizer_available(&self) -> bool {
        self.sampler.is_available()
    }

    pub fn pending_tick(&self) -> Option<TickId> {
        self.sampler.pending_tick()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn current_entry(&self) -> Option<&MediaEntry<B::Source>> {
        self.transport
            .current_index()
            .and_then(|i| self.library.get(i))
    }

    // ===== LIBRARY =====

    /// Ingest picked files under the configured policy. Returns how many
    /// entries were added.
    pub fn ingest(&mut self, files: impl IntoIterator<Item = PickedFile<B::Source>>) -> usize {
        let entries = build_entries(&mut self.library, files, self.config.policy);
        self.add(entries)
    }

    /// Append entries. The first entry is auto-selected when the library was
    /// empty; playback is not started.
    pub fn add(&mut self, entries: impl IntoIterator<Item = MediaEntry<B::Source>>) -> usize {
        let previous_len = self.library.len();
        let added = self.library.add(entries);
        self.transport.entries_added(previous_len, self.library.len());
        if added > 0 {
            tracing::info!(added, total = self.library.len(), "Added media");
        }
        self.sync_media();
        added
    }

    /// Remove an entry and release its source.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::UnknownEntry`] for an id not in the library.
    pub fn remove(&mut self, id: &MediaId) -> Result<(), PlayerError> {
        let (index, entry) = self.library.remove(id)?;
        let effect = self.transport.entry_removed(index, self.library.len());
        tracing::info!(name = %entry.name, index, ?effect, "Removed media");
        if effect == RemovalEffect::CurrentRemoved {
            self.clock.reset();
        }
        // The element lets go of the source before the handle is released.
        self.sync_media();
        drop(entry);
        Ok(())
    }

    /// Remove every entry and return to the neutral state.
    pub fn clear(&mut self) {
        let entries = self.library.clear();
        self.transport.reset();
        self.sync_media();
        tracing::info!(removed = entries.len(), "Cleared library");
        drop(entries);
    }

    // ===== TRANSPORT =====

    /// Select an entry, keeping the current play/pause state.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidSelection`] for an out of range index.
    pub fn select(&mut self, index: usize) -> Result<(), PlayerError> {
        self.transport.select(index, self.library.len())?;
        self.sync_media();
        Ok(())
    }

    /// Select an entry and start playing it.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidSelection`] for an out of range index.
    pub fn select_and_play(&mut self, index: usize) -> Result<(), PlayerError> {
        self.transport.select(index, self.library.len())?;
        self.resume_if_suspended();
        self.transport.set_playing(true);
        self.sync_media();
        Ok(())
    }

    /// Flip between playing and paused. Returns `false` on an empty library.
    pub fn toggle_play(&mut self) -> bool {
        if !self.transport.is_playing() {
            self.resume_if_suspended();
        }
        let changed = self.transport.toggle(self.library.len());
        if changed {
            tracing::debug!(playing = self.transport.is_playing(), "Toggled playback");
            self.sync_media();
        }
        changed
    }

    pub fn next(&mut self) -> bool {
        let changed = self.transport.next(self.library.len());
        if changed {
            self.sync_media();
        }
        changed
    }

    pub fn previous(&mut self) -> bool {
        let changed = self.transport.previous(self.library.len());
        if changed {
            self.sync_media();
        }
        changed
    }

    /// Natural end of the current media: advance, keeping the playing flag.
    pub fn on_track_end(&mut self) -> bool {
        let finished = self.loaded.clone();
        if !self.transport.track_ended(self.library.len()) {
            return false;
        }
        self.sync_media();
        // A single entry wraps onto itself: start it over.
        if self.transport.is_playing() && finished.is_some() && self.loaded == finished {
            self.backend.seek(0.0);
            self.clock.seeked(0.0);
            self.begin_playback();
        }
        true
    }

    /// Pause and rewind the current entry.
    pub fn stop(&mut self) {
        self.transport.set_playing(false);
        self.sync_media();
        if self.loaded.is_some() {
            self.backend.seek(0.0);
            self.clock.seeked(0.0);
        }
    }

    // ===== CLOCK =====

    /// Jump to `fraction` of the current media. Returns the target time.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoActiveMedia`] with nothing loaded,
    /// [`PlayerError::UnknownDuration`] before metadata arrives and
    /// [`PlayerError::InvalidSeek`] for NaN.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<f64, PlayerError> {
        if self.loaded.is_none() {
            return Err(PlayerError::NoActiveMedia);
        }
        let target = self.clock.seek_target(fraction)?;
        self.backend.seek(target);
        self.clock.seeked(target);
        Ok(target)
    }

    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
    }

    // ===== EVENTS =====

    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate {
                current_time,
                duration,
            } => {
                if self.loaded.is_some() {
                    self.clock.on_time_update(current_time, duration);
                }
            }
            MediaEvent::Ended => {
                self.on_track_end();
            }
            MediaEvent::PlaybackRejected(reason) => {
                tracing::warn!(%reason, "Playback did not start");
            }
            MediaEvent::Tick(id) => {
                self.on_tick(id);
            }
        }
    }

    /// Deliver a scheduled tick. Returns the new frame while playing.
    pub fn on_tick(&mut self, id: TickId) -> Option<&SpectrumFrame> {
        let playing = self.transport.is_playing();
        self.sampler.on_tick(id, playing, &mut self.scheduler)
    }

    /// Apply a render surface command.
    ///
    /// # Errors
    ///
    /// Propagates selection, removal and seek errors. Navigation on an
    /// empty library is not an error.
    pub fn dispatch(&mut self, command: PlayerCommand) -> Result<(), PlayerError> {
        match command {
            PlayerCommand::Select(index) => self.select(index)?,
            PlayerCommand::SelectAndPlay(index) => self.select_and_play(index)?,
            PlayerCommand::TogglePlay => {
                self.toggle_play();
            }
            PlayerCommand::Next => {
                self.next();
            }
            PlayerCommand::Previous => {
                self.previous();
            }
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::Seek(fraction) => {
                self.seek_to_fraction(fraction)?;
            }
            PlayerCommand::SetVolume(volume) => self.set_volume(volume),
            PlayerCommand::Remove(id) => self.remove(&id)?,
            PlayerCommand::Clear => self.clear(),
        }
        Ok(())
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            entries: self
                .library
                .iter()
                .map(|e| EntryView {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    kind: e.kind,
                })
                .collect(),
            current_index: self.transport.current_index(),
            phase: self.transport.phase(),
            is_playing: self.transport.is_playing(),
            clock: self.clock,
            volume: self.volume,
            spectrum: *self.sampler.frame(),
            visualizer_available: self.sampler.is_available(),
        }
    }

    /// Stop the tick loop, close the graph, detach the element and release
    /// every source. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.sampler.teardown(&mut self.scheduler);
        if self.element_playing {
            self.backend.pause();
            self.element_playing = false;
        }
        if self.loaded.take().is_some() {
            self.backend.unload();
        }
        self.transport.reset();
        self.clock.reset();
        drop(self.library.clear());
    }

    // ===== INTERNALS =====

    /// Bring the element, clock and tick loop in line with the transport.
    fn sync_media(&mut self) {
        if self.library.is_empty() {
            self.transport.reset();
        }

        let mut reloaded = false;
        let current = self
            .transport
            .current_index()
            .and_then(|i| self.library.get(i));
        match current {
            Some(entry) if self.loaded.as_ref() != Some(&entry.id) => {
                let id = entry.id.clone();
                self.backend.load(&entry.source, entry.kind);
                tracing::debug!(name = %entry.name, kind = ?entry.kind, "Loaded media");
                self.loaded = Some(id);
                self.element_playing = false;
                self.clock.reset();
                reloaded = true;
            }
            Some(_) => {}
            None => {
                if self.loaded.take().is_some() {
                    self.backend.unload();
                    self.element_playing = false;
                }
                self.clock.reset();
                self.sampler.clear_frame();
            }
        }

        if self.transport.is_playing() {
            if reloaded || !self.element_playing {
                self.begin_playback();
            }
        } else {
            if self.element_playing {
                self.backend.pause();
                self.element_playing = false;
            }
            self.sampler.stop(&mut self.scheduler);
        }
        debug_assert!(!self.transport.is_playing() || self.loaded.is_some());
    }

    fn begin_playback(&mut self) {
        let smoothing = self.config.smoothing;
        let backend = &mut self.backend;
        self.sampler
            .ensure_graph(|| backend.create_graph(FFT_SIZE, smoothing));
        if let Err(e) = self.backend.play() {
            tracing::warn!(error = %e, "Playback did not start");
        }
        self.element_playing = true;
        self.sampler.start(&mut self.scheduler);
    }

    fn resume_if_suspended(&mut self) {
        if let Some(graph) = self.sampler.graph_mut() {
            if graph.is_suspended() {
                if let Err(e) = graph.resume() {
                    tracing::warn!(error = %e, "Trying playback anyway");
                }
            }
        }
    }
}

impl<B: MediaBackend, S: FrameScheduler> Drop for PlayerSession<B, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
