//! Same-origin navigation targets.

#[cfg(test)]
#[path = "navigate_test.rs"]
mod navigate_test;

/// A path plus an optional single query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavTarget {
    pub path: String,
    pub query: Option<(String, String)>,
}

impl NavTarget {
    pub fn path(path: impl Into<String>) -> Self {
        Self { path: path.into(), query: None }
    }

    pub fn with_query(path: impl Into<String>, param: impl Into<String>, value: impl Into<String>) -> Self {
        Self { path: path.into(), query: Some((param.into(), value.into())) }
    }

    /// Render as an href, running the query value through `encode`.
    pub fn href(&self, encode: impl Fn(&str) -> String) -> String {
        match &self.query {
            Some((param, value)) => format!("{}?{param}={}", self.path, encode(value)),
            None => self.path.clone(),
        }
    }
}

/// Moves the page to another location.
pub trait Navigator {
    fn navigate(&self, target: &NavTarget);
}

/// Search page target for `query`, or `None` for an empty query.
pub fn search_target(path: &str, param: &str, query: &str) -> Option<NavTarget> {
    if query.is_empty() {
        return None;
    }
    Some(NavTarget::with_query(path, param, query))
}

/// Sets `window.location.href`.
#[cfg(feature = "hydrate")]
pub struct LocationNavigator;

#[cfg(feature = "hydrate")]
impl Navigator for LocationNavigator {
    fn navigate(&self, target: &NavTarget) {
        let href = target.href(|value| String::from(js_sys::encode_uri_component(value)));
        let Some(window) = web_sys::window() else {
            log::warn!("no window; cannot navigate to {href}");
            return;
        };
        if let Err(err) = window.location().set_href(&href) {
            log::error!("navigation to {href} failed: {err:?}");
        }
    }
}
