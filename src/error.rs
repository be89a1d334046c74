//! Error types shared across the controller.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is allowed to abort page bootstrap. Callers log these errors
//! or turn them into danger notifications; they never escape to the host page.

use crate::config::ConfigError;
use crate::net::service::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// A browser API call rejected or threw.
    #[error("browser call failed: {0}")]
    Js(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// A chart configuration could not be serialized for the renderer.
    #[error("failed to encode chart config: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(feature = "hydrate")]
impl UiError {
    /// Convert a thrown JS value into an error, keeping its message if it has one.
    pub fn from_js(value: wasm_bindgen::JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| match js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str("message")) {
                Ok(message) => message.as_string(),
                Err(_) => None,
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}
