//! `requestAnimationFrame` tick scheduling.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use waves_core::{FrameScheduler, PlayerError, TickId};

use crate::media_element::describe;

/// Ticks delivered by the browser, drained by the app each frame.
pub type TickQueue = Rc<RefCell<VecDeque<TickId>>>;

pub struct AnimationFrameScheduler {
    window: web_sys::Window,
    requested: Rc<Cell<Option<i32>>>,
    callback: Closure<dyn FnMut(f64)>,
}

impl AnimationFrameScheduler {
    pub fn new(window: web_sys::Window, ticks: TickQueue) -> Self {
        let requested = Rc::new(Cell::new(None::<i32>));
        let fired = requested.clone();
        let callback = Closure::wrap(Box::new(move |_timestamp: f64| {
            if let Some(handle) = fired.take() {
                ticks.borrow_mut().push_back(TickId(handle));
            }
        }) as Box<dyn FnMut(f64)>);
        Self {
            window,
            requested,
            callback,
        }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_tick(&mut self) -> Result<TickId, PlayerError> {
        let handle = self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map_err(|e| PlayerError::VisualizerUnavailable(describe(&e)))?;
        self.requested.set(Some(handle));
        Ok(TickId(handle))
    }

    fn cancel_tick(&mut self, id: TickId) {
        if self.requested.get() == Some(id.0) {
            self.requested.set(None);
        }
        // No-op for frames that already ran.
        let _ = self.window.cancel_animation_frame(id.0);
    }
}

impl Drop for AnimationFrameScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.requested.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}
