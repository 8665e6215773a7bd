//! In-memory backend, graph and scheduler used by the unit tests.

use std::cell::Cell;
use std::rc::Rc;

use crate::backend::{AudioGraph, FrameScheduler, MediaBackend, TickId};
use crate::error::PlayerError;
use crate::ingest::PickedFile;
use crate::media::MediaKind;

/// Source handle that counts its releases.
#[derive(Debug)]
pub struct TestSource {
    pub name: String,
    releases: Rc<Cell<u32>>,
}

impl TestSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            releases: Rc::new(Cell::new(0)),
        }
    }

    pub fn released_flag(&self) -> Rc<Cell<u32>> {
        self.releases.clone()
    }
}

impl Drop for TestSource {
    fn drop(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

pub fn audio_file(name: &str) -> PickedFile<TestSource> {
    PickedFile {
        file_name: format!("{name}.mp3"),
        mime_type: "audio/mpeg".to_owned(),
        source: TestSource::new(name),
    }
}

#[derive(Debug, Default)]
pub struct TestGraph {
    level: u8,
    pub suspended: bool,
    pub fail_resume: bool,
    resumes: Rc<Cell<u32>>,
    closed: Rc<Cell<bool>>,
}

impl TestGraph {
    pub fn with_level(level: u8) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

impl AudioGraph for TestGraph {
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), PlayerError> {
        self.resumes.set(self.resumes.get() + 1);
        if self.fail_resume {
            return Err(PlayerError::ResumeFailed("not allowed".into()));
        }
        self.suspended = false;
        Ok(())
    }

    fn read_frequency_data(&mut self, out: &mut [u8]) {
        out.fill(self.level);
    }

    fn close(&mut self) {
        self.closed.set(true);
    }
}

#[derive(Debug, Default)]
pub struct TestScheduler {
    next_id: i32,
    pub requested: usize,
    pub pending: Vec<TickId>,
    pub cancelled: Vec<TickId>,
}

impl TestScheduler {
    /// Deliver the oldest pending tick.
    pub fn fire(&mut self) -> Option<TickId> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for TestScheduler {
    fn request_tick(&mut self) -> Result<TickId, PlayerError> {
        self.next_id += 1;
        self.requested += 1;
        let id = TickId(self.next_id);
        self.pending.push(id);
        Ok(id)
    }

    fn cancel_tick(&mut self, id: TickId) {
        self.pending.retain(|p| *p != id);
        self.cancelled.push(id);
    }
}

/// Records every call the session makes on the media element.
#[derive(Debug, Default)]
pub struct TestBackend {
    pub loaded: Option<(String, MediaKind)>,
    pub loads: usize,
    pub playing: bool,
    pub plays: usize,
    pub seeks: Vec<f64>,
    pub volume: f64,
    pub fail_play: bool,
    pub fail_graph: bool,
    pub graph_suspended: bool,
    pub graph_fail_resume: bool,
    pub graphs_created: usize,
    pub resumes: Rc<Cell<u32>>,
    pub graph_closed: Rc<Cell<bool>>,
}

impl MediaBackend for TestBackend {
    type Source = TestSource;
    type Graph = TestGraph;

    fn load(&mut self, source: &TestSource, kind: MediaKind) {
        self.loaded = Some((source.name.clone(), kind));
        self.loads += 1;
        self.playing = false;
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.playing = false;
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.plays += 1;
        if self.fail_play {
            return Err(PlayerError::PlaybackStart("blocked".into()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn create_graph(&mut self, fft_size: u32, _smoothing: f64) -> Result<TestGraph, PlayerError> {
        assert_eq!(fft_size, crate::spectrum::FFT_SIZE);
        self.graphs_created += 1;
        if self.fail_graph {
            return Err(PlayerError::VisualizerUnavailable("unsupported".into()));
        }
        Ok(TestGraph {
            level: 51,
            suspended: self.graph_suspended,
            fail_resume: self.graph_fail_resume,
            resumes: self.resumes.clone(),
            closed: self.graph_closed.clone(),
        })
    }
}
