//! Grid/list toggle for the notebook container.
//!
//! The toggle owns which control is active and the mode it selected. It does
//! not own the initial layout: until the first selection the container keeps
//! whatever the markup rendered.

#[cfg(test)]
#[path = "view_mode_test.rs"]
mod view_mode_test;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Responsive multi-column tiles. Any value other than `list` lands here.
    #[default]
    Grid,
    /// One notebook per row.
    List,
}

impl ViewMode {
    /// Read a `data-view` value. Only `list` selects the list layout.
    pub fn from_attr(raw: &str) -> Self {
        if raw == "list" { Self::List } else { Self::Grid }
    }
}

/// Column rule applied to the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `1fr`.
    SingleColumn,
    /// As many tracks as fit, none narrower than `min_track_px`.
    AutoFill { min_track_px: u32 },
}

impl Layout {
    #[must_use]
    pub fn for_mode(mode: ViewMode, min_track_px: u32) -> Self {
        match mode {
            ViewMode::List => Self::SingleColumn,
            ViewMode::Grid => Self::AutoFill { min_track_px },
        }
    }

    /// Value for `grid-template-columns`.
    #[must_use]
    pub fn grid_template_columns(self) -> String {
        match self {
            Self::SingleColumn => "1fr".to_owned(),
            Self::AutoFill { min_track_px } => format!("repeat(auto-fill, minmax({min_track_px}px, 1fr))"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewToggle {
    buttons: Vec<String>,
    active: Option<usize>,
    mode: Option<ViewMode>,
    min_track_px: u32,
}

impl ViewToggle {
    /// `buttons` are the controls' `data-view` values in document order.
    pub fn new(buttons: Vec<String>, initially_active: Option<usize>, min_track_px: u32) -> Self {
        let active = initially_active.filter(|index| *index < buttons.len());
        Self { buttons, active, mode: None, min_track_px }
    }

    /// Activate control `index`. Returns the layout to apply, or `None` if
    /// there is no such control.
    pub fn select(&mut self, index: usize) -> Option<Layout> {
        let mode = ViewMode::from_attr(self.buttons.get(index)?);
        self.active = Some(index);
        self.mode = Some(mode);
        Some(Layout::for_mode(mode, self.min_track_px))
    }

    /// Activate the first control carrying `value`.
    ///
    /// A value no control carries is not an error: it falls back to the grid
    /// layout and activates the first non-`list` control. Returns `None` only
    /// when the toggle has no controls at all.
    pub fn select_mode(&mut self, value: &str) -> Option<Layout> {
        if let Some(index) = self.buttons.iter().position(|button| button == value) {
            return self.select(index);
        }
        if self.buttons.is_empty() {
            return None;
        }
        let mode = ViewMode::from_attr(value);
        if let Some(index) = self.buttons.iter().position(|button| ViewMode::from_attr(button) == mode) {
            self.active = Some(index);
        }
        self.mode = Some(mode);
        Some(Layout::for_mode(mode, self.min_track_px))
    }

    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    /// Mode chosen by the last selection, if any.
    #[must_use]
    pub fn mode(&self) -> Option<ViewMode> {
        self.mode
    }

    #[must_use]
    pub fn layout(&self) -> Option<Layout> {
        self.mode.map(|mode| Layout::for_mode(mode, self.min_track_px))
    }

    #[must_use]
    pub fn buttons(&self) -> &[String] {
        &self.buttons
    }
}
