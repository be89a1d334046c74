//! Page-wide keyboard shortcuts and same-page link targets.

#[cfg(test)]
#[path = "shortcuts_test.rs"]
mod shortcuts_test;

/// The parts of a key event the shortcut table cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS.
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    FocusSearch,
}

/// Map a key event to a shortcut. Matching shortcuts also suppress the
/// browser's default action.
pub fn match_shortcut(chord: &KeyChord) -> Option<Shortcut> {
    if chord.command() && chord.key.eq_ignore_ascii_case("k") {
        return Some(Shortcut::FocusSearch);
    }
    None
}

/// Element id targeted by a same-page link, e.g. `#top` → `top`.
///
/// Returns `None` for anything that is not a non-empty fragment.
pub fn fragment_id(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() { None } else { Some(id) }
}
