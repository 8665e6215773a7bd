//! Browser front end for WAVES: web-sys backends for the player core, an
//! egui render surface and the eframe entry point.

pub mod rejection;
pub mod ui;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod media_element;
#[cfg(target_arch = "wasm32")]
mod picker;
#[cfg(target_arch = "wasm32")]
mod scheduler;

#[cfg(target_arch = "wasm32")]
pub use web::start;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use waves_core::PlayerConfig;

    use crate::app::WavesApp;
    use crate::media_element::describe;

    const CANVAS_ID: &str = "waves_canvas";
    const CONFIG_ID: &str = "waves-config";

    /// Read the optional `<script type="application/json" id="waves-config">`.
    fn load_config(document: &web_sys::Document) -> PlayerConfig {
        let Some(text) = document
            .get_element_by_id(CONFIG_ID)
            .and_then(|el| el.text_content())
        else {
            return PlayerConfig::default();
        };
        PlayerConfig::from_json(&text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default player configuration");
            PlayerConfig::default()
        })
    }

    /// WASM entry point.
    ///
    /// # Errors
    ///
    /// Fails when the page has no window, document or `waves_canvas`.
    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        crate::logging::init();

        let document = web_sys::window()
            .ok_or("no global window exists")?
            .document()
            .ok_or("should have a document on window")?;
        let config = load_config(&document);
        tracing::info!(policy = ?config.policy, "Starting WAVES");

        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .ok_or("no canvas element with id 'waves_canvas'")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        wasm_bindgen_futures::spawn_local(async move {
            let web_options = eframe::WebOptions::default();
            let started = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(move |cc| match WavesApp::new(cc, config) {
                        Ok(app) => Ok(Box::new(app)),
                        Err(e) => Err(describe(&e).into()),
                    }),
                )
                .await;
            if let Err(e) = started {
                tracing::error!(error = %describe(&e), "Failed to start eframe");
            }
        });

        Ok(())
    }
}
