//! Hidden `<input type="file">` feeding picked files to the session.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use waves_core::{IngestPolicy, PickedFile};

use crate::media_element::{describe, ObjectUrl};

const PICKER_ID: &str = "waves_file_input";

/// Files picked since the last frame.
pub type PickedQueue = Rc<RefCell<Vec<PickedFile<ObjectUrl>>>>;

pub struct FilePicker {
    input: web_sys::HtmlInputElement,
    _on_change: Closure<dyn FnMut(web_sys::Event)>,
}

impl FilePicker {
    pub fn install(
        document: &web_sys::Document,
        policy: IngestPolicy,
        picked: PickedQueue,
        repaint: egui::Context,
    ) -> Result<Self, JsValue> {
        let existing = document
            .get_element_by_id(PICKER_ID)
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok());
        let input = match existing {
            Some(input) => input,
            None => {
                let input = document
                    .create_element("input")?
                    .dyn_into::<web_sys::HtmlInputElement>()?;
                input.set_type("file");
                input.set_id(PICKER_ID);
                input.set_multiple(true);
                input.style().set_property("display", "none")?;
                document
                    .body()
                    .ok_or("document has no body")?
                    .append_child(&input)?;
                input
            }
        };
        input.set_accept(policy.accept_attribute());

        let on_change = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            else {
                return;
            };
            if let Some(files) = input.files() {
                let mut picked = picked.borrow_mut();
                for i in 0..files.length() {
                    let Some(file) = files.get(i) else { continue };
                    match ObjectUrl::from_blob(&file) {
                        Ok(source) => picked.push(PickedFile {
                            file_name: file.name(),
                            mime_type: file.type_(),
                            source,
                        }),
                        Err(e) => tracing::warn!(
                            file = %file.name(),
                            error = %describe(&e),
                            "Could not create object URL"
                        ),
                    }
                }
            }
            input.set_value(""); // Reset for next use
            repaint.request_repaint();
        }) as Box<dyn FnMut(web_sys::Event)>);
        input.set_onchange(Some(on_change.as_ref().unchecked_ref()));

        Ok(Self {
            input,
            _on_change: on_change,
        })
    }

    pub fn open(&self) {
        self.input.click();
    }
}

impl Drop for FilePicker {
    fn drop(&mut self) {
        self.input.set_onchange(None);
    }
}
