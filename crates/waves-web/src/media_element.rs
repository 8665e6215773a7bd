//! `HTMLMediaElement` and Web Audio implementations of the core backend.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use waves_core::{AudioGraph, IngestPolicy, MediaBackend, MediaEvent, MediaKind, PlayerError};

use crate::rejection::PlayRejection;

const ELEMENT_ID: &str = "waves_media";

/// Element events waiting for the next frame.
pub type EventQueue = Rc<RefCell<VecDeque<MediaEvent>>>;

/// Human readable text for a thrown or rejected JS value.
pub fn describe(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn rejection(value: &JsValue) -> PlayRejection {
    match value.dyn_ref::<web_sys::DomException>() {
        Some(exception) => PlayRejection::classify(&exception.name(), &exception.message()),
        None => PlayRejection::Failed(describe(value)),
    }
}

/// Object URL for a picked file. Revoked on drop.
#[derive(Debug)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn from_blob(blob: &web_sys::Blob) -> Result<Self, JsValue> {
        web_sys::Url::create_object_url_with_blob(blob).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(e) = web_sys::Url::revoke_object_url(&self.0) {
            tracing::warn!(url = %self.0, error = %describe(&e), "Could not revoke object URL");
        }
    }
}

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// The page's single `<audio>` (or `<video>`, for the dual-media player).
pub struct HtmlMediaBackend {
    element: web_sys::HtmlMediaElement,
    events: EventQueue,
    listeners: Vec<(&'static str, Listener)>,
}

impl HtmlMediaBackend {
    /// Reuse or create the media element and hook its timing events.
    pub fn attach(
        document: &web_sys::Document,
        policy: IngestPolicy,
        events: EventQueue,
    ) -> Result<Self, JsValue> {
        let existing = document
            .get_element_by_id(ELEMENT_ID)
            .and_then(|el| el.dyn_into::<web_sys::HtmlMediaElement>().ok());
        let element = match existing {
            Some(element) => element,
            None => {
                let tag = match policy {
                    IngestPolicy::AudioOnly => "audio",
                    IngestPolicy::AudioAndVideo => "video",
                };
                let element = document
                    .create_element(tag)?
                    .dyn_into::<web_sys::HtmlMediaElement>()?;
                element.set_id(ELEMENT_ID);
                element.set_cross_origin(Some("anonymous"));
                element.style().set_property("display", "none")?;
                document
                    .body()
                    .ok_or("document has no body")?
                    .append_child(&element)?;
                element
            }
        };

        let mut backend = Self {
            element,
            events,
            listeners: Vec::new(),
        };
        backend.listen("timeupdate", time_update)?;
        backend.listen("durationchange", time_update)?;
        backend.listen("ended", |_| MediaEvent::Ended)?;
        Ok(backend)
    }

    fn listen(
        &mut self,
        name: &'static str,
        to_event: fn(&web_sys::HtmlMediaElement) -> MediaEvent,
    ) -> Result<(), JsValue> {
        let element = self.element.clone();
        let events = self.events.clone();
        let listener = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            events.borrow_mut().push_back(to_event(&element));
        }) as Box<dyn FnMut(web_sys::Event)>);
        self.element
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        self.listeners.push((name, listener));
        Ok(())
    }

    fn show(&self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        if let Err(e) = self.element.style().set_property("display", display) {
            tracing::debug!(error = %describe(&e), "Could not toggle media element");
        }
    }
}

fn time_update(element: &web_sys::HtmlMediaElement) -> MediaEvent {
    MediaEvent::TimeUpdate {
        current_time: element.current_time(),
        duration: element.duration(),
    }
}

impl Drop for HtmlMediaBackend {
    fn drop(&mut self) {
        for (name, listener) in &self.listeners {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

impl MediaBackend for HtmlMediaBackend {
    type Source = ObjectUrl;
    type Graph = WebAudioGraph;

    fn load(&mut self, source: &ObjectUrl, kind: MediaKind) {
        self.element.set_src(source.as_str());
        self.show(kind == MediaKind::Video);
    }

    fn unload(&mut self) {
        self.pause();
        if let Err(e) = self.element.remove_attribute("src") {
            tracing::warn!(error = %describe(&e), "Could not detach media source");
        }
        self.element.load();
        self.show(false);
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlayerError::PlaybackStart(describe(&e)))?;
        let events = self.events.clone();
        spawn_local(async move {
            let Err(e) = JsFuture::from(promise).await else {
                return;
            };
            match rejection(&e) {
                PlayRejection::Interrupted => tracing::debug!("play() interrupted"),
                PlayRejection::Failed(reason) => events
                    .borrow_mut()
                    .push_back(MediaEvent::PlaybackRejected(reason)),
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            tracing::warn!(error = %describe(&e), "Pause failed");
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }

    fn create_graph(&mut self, fft_size: u32, smoothing: f64) -> Result<WebAudioGraph, PlayerError> {
        let build = || -> Result<WebAudioGraph, JsValue> {
            let context = web_sys::AudioContext::new()?;
            let analyser = context.create_analyser()?;
            analyser.set_fft_size(fft_size);
            analyser.set_smoothing_time_constant(smoothing);

            let source = context.create_media_element_source(&self.element)?;
            source.connect_with_audio_node(&analyser)?;
            analyser.connect_with_audio_node(&context.destination())?;

            Ok(WebAudioGraph {
                context,
                analyser,
                _source: source,
            })
        };
        build().map_err(|e| PlayerError::VisualizerUnavailable(describe(&e)))
    }
}

/// Context, analyser and element source node, built once per session.
pub struct WebAudioGraph {
    context: web_sys::AudioContext,
    analyser: web_sys::AnalyserNode,
    _source: web_sys::MediaElementAudioSourceNode,
}

impl AudioGraph for WebAudioGraph {
    fn is_suspended(&self) -> bool {
        self.context.state() == web_sys::AudioContextState::Suspended
    }

    fn resume(&mut self) -> Result<(), PlayerError> {
        let promise = self
            .context
            .resume()
            .map_err(|e| PlayerError::ResumeFailed(describe(&e)))?;
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                tracing::warn!(error = %describe(&e), "Audio context did not resume");
            }
        });
        Ok(())
    }

    fn read_frequency_data(&mut self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }

    fn close(&mut self) {
        if let Err(e) = self.context.close() {
            tracing::debug!(error = %describe(&e), "Audio context close failed");
        }
    }
}
