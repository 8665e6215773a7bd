use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use waves_core::{MediaEvent, PlayerConfig, PlayerSession};

use crate::media_element::{EventQueue, HtmlMediaBackend};
use crate::picker::{FilePicker, PickedQueue};
use crate::scheduler::{AnimationFrameScheduler, TickQueue};
use crate::ui::{self, UiAction};

const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub struct WavesApp {
    session: PlayerSession<HtmlMediaBackend, AnimationFrameScheduler>,
    picker: FilePicker,
    // Filled by browser callbacks, drained at the start of each frame.
    picked: PickedQueue,
    events: EventQueue,
    ticks: TickQueue,
    last_error: Option<String>,
    actions: Vec<UiAction>,
}

impl WavesApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: PlayerConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no global window exists")?;
        let document = window.document().ok_or("should have a document on window")?;

        let events: EventQueue = Rc::new(RefCell::new(VecDeque::new()));
        let ticks: TickQueue = Rc::new(RefCell::new(VecDeque::new()));
        let picked: PickedQueue = Rc::new(RefCell::new(Vec::new()));

        let backend = HtmlMediaBackend::attach(&document, config.policy, events.clone())?;
        let scheduler = AnimationFrameScheduler::new(window, ticks.clone());
        let picker = FilePicker::install(
            &document,
            config.policy,
            picked.clone(),
            cc.egui_ctx.clone(),
        )?;

        Ok(Self {
            session: PlayerSession::new(backend, scheduler, config),
            picker,
            picked,
            events,
            ticks,
            last_error: None,
            actions: Vec::new(),
        })
    }

    /// Feed everything the browser queued since the last frame into the session.
    fn pump(&mut self) {
        let files: Vec<_> = self.picked.borrow_mut().drain(..).collect();
        if !files.is_empty() {
            let added = self.session.ingest(files);
            tracing::info!(added, total = self.session.library().len(), "Files picked");
        }

        loop {
            let Some(event) = self.events.borrow_mut().pop_front() else {
                break;
            };
            if let MediaEvent::PlaybackRejected(reason) = &event {
                self.last_error = Some(format!("Playback failed: {reason}"));
            }
            self.session.handle_event(event);
        }

        loop {
            let Some(tick) = self.ticks.borrow_mut().pop_front() else {
                break;
            };
            self.session.on_tick(tick);
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::AddMedia => self.picker.open(),
            UiAction::Command(command) => {
                tracing::debug!(?command, "Player command");
                match self.session.dispatch(command) {
                    Ok(()) => self.last_error = None,
                    Err(e) => {
                        tracing::warn!(error = %e, "Command failed");
                        self.last_error = Some(e.to_string());
                    }
                }
            }
        }
    }
}

impl eframe::App for WavesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();

        let snapshot = self.session.snapshot();
        let mut actions = std::mem::take(&mut self.actions);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::player_panel(ui, &snapshot, self.last_error.as_deref(), &mut actions);
        });
        for action in actions.drain(..) {
            self.apply(action);
        }
        self.actions = actions;

        // Ticks and time updates arrive outside egui's input loop.
        if self.session.transport().is_playing() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }
    }
}
