//! Background update worker registration.
//!
//! Registration is fire-and-forget. Its outcome is only logged and never
//! affects the rest of the page.

#[cfg(test)]
#[path = "worker_test.rs"]
mod worker_test;

use futures::future::LocalBoxFuture;

use crate::error::UiError;

pub trait WorkerRegistrar {
    /// Register `script`; resolves to the registration scope.
    fn register(&self, script: &str) -> LocalBoxFuture<'static, Result<String, UiError>>;
}

/// Register the update worker and log the result. Resolves to `true` on success.
pub fn register_update_worker(registrar: &dyn WorkerRegistrar, script: &str) -> LocalBoxFuture<'static, bool> {
    let pending = registrar.register(script);
    let script = script.to_owned();
    Box::pin(async move {
        match pending.await {
            Ok(scope) => {
                log::info!("update worker {script} registered for scope {scope}");
                true
            }
            Err(err) => {
                log::warn!("update worker {script} registration failed: {err}");
                false
            }
        }
    })
}

/// `navigator.serviceWorker`, when the browser has one.
#[cfg(feature = "hydrate")]
pub struct ServiceWorkerRegistrar {
    container: web_sys::ServiceWorkerContainer,
}

#[cfg(feature = "hydrate")]
impl ServiceWorkerRegistrar {
    pub fn detect() -> Option<Self> {
        let navigator = web_sys::window()?.navigator();
        let supported = js_sys::Reflect::has(&navigator, &wasm_bindgen::JsValue::from_str("serviceWorker"));
        if !matches!(supported, Ok(true)) {
            log::debug!("service workers unsupported");
            return None;
        }
        Some(Self { container: navigator.service_worker() })
    }
}

#[cfg(feature = "hydrate")]
impl WorkerRegistrar for ServiceWorkerRegistrar {
    fn register(&self, script: &str) -> LocalBoxFuture<'static, Result<String, UiError>> {
        use wasm_bindgen::JsCast;

        let promise = self.container.register(script);
        Box::pin(async move {
            let value = wasm_bindgen_futures::JsFuture::from(promise)
                .await
                .map_err(UiError::from_js)?;
            let registration: web_sys::ServiceWorkerRegistration =
                value.dyn_into().map_err(UiError::from_js)?;
            Ok(registration.scope())
        })
    }
}
