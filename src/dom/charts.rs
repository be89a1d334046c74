//! Chart.js renderer.
//!
//! Chart.js is loaded by the page as a global script. The renderer is only
//! offered when `window.Chart` exists.

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement};

use crate::error::UiError;
use crate::state::charts::{ChartRenderer, ChartSpec};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<ChartJs, JsValue>;
}

pub struct ChartJsRenderer {
    document: Document,
}

impl ChartJsRenderer {
    pub fn detect(document: Document) -> Option<Self> {
        let window = web_sys::window()?;
        let loaded = js_sys::Reflect::has(&window, &JsValue::from_str("Chart"));
        if matches!(loaded, Ok(true)) {
            Some(Self { document })
        } else {
            log::debug!("Chart.js not loaded");
            None
        }
    }
}

impl ChartRenderer for ChartJsRenderer {
    fn has_mount(&self, mount_id: &str) -> bool {
        self.document.get_element_by_id(mount_id).is_some()
    }

    fn render(&self, spec: &ChartSpec) -> Result<(), UiError> {
        let canvas = self
            .document
            .get_element_by_id(&spec.mount_id)
            .ok_or_else(|| UiError::Js(format!("#{} is gone", spec.mount_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| UiError::Js(format!("#{} is not a canvas", spec.mount_id)))?;
        let config = serde_json::to_string(&spec.to_config())?;
        let config = js_sys::JSON::parse(&config).map_err(UiError::from_js)?;
        ChartJs::new(&canvas, &config).map_err(UiError::from_js)?;
        log::debug!("chart {} rendered", spec.mount_id);
        Ok(())
    }
}
