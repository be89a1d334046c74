//! Dashboard chart widgets and their selector button groups.
//!
//! This layer decides *whether* a chart is constructed (its mount point
//! exists and it has not been built yet) and *with what static config*.
//! Drawing belongs to the [`ChartRenderer`] collaborator.
//!
//! Selector buttons toggle their active state only. Switching a selection
//! does not swap the chart's dataset.

#[cfg(test)]
#[path = "charts_test.rs"]
mod charts_test;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::UiError;

pub const MARKET_CAP_CHART: &str = "marketCapChart";
pub const ADOPTION_CHART: &str = "adoptionChart";
pub const STABLECOIN_CHART: &str = "stablecoinChart";

const PALETTE: [&str; 5] = ["#26A69A", "#2196F3", "#FFC107", "#4CAF50", "#9E9E9E"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Line,
    Bar,
}

/// How the single series is painted.
#[derive(Clone, Debug, PartialEq)]
pub enum SeriesStyle {
    /// One color per segment (doughnut).
    Segments { colors: Vec<String> },
    /// Filled line.
    Area { stroke: String, fill: String, tension: f64 },
    /// One color per bar.
    Bars { colors: Vec<String>, radius: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Legend {
    Hidden,
    Bottom { padding: u32, point_style: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub mount_id: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series_label: Option<String>,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
    pub legend: Legend,
    /// Cartesian axes; `None` for radial charts.
    pub axes: Option<Axes>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Axes {
    pub begin_at_zero: bool,
    pub grid_lines: bool,
}

impl ChartSpec {
    /// Chart.js-compatible configuration object.
    #[must_use]
    pub fn to_config(&self) -> Value {
        let mut dataset = json!({ "data": self.values });
        if let Some(label) = &self.series_label {
            dataset["label"] = json!(label);
        }
        match &self.style {
            SeriesStyle::Segments { colors } => {
                dataset["backgroundColor"] = json!(colors);
                dataset["borderWidth"] = json!(0);
            }
            SeriesStyle::Area { stroke, fill, tension } => {
                dataset["borderColor"] = json!(stroke);
                dataset["backgroundColor"] = json!(fill);
                dataset["tension"] = json!(tension);
                dataset["fill"] = json!(true);
            }
            SeriesStyle::Bars { colors, radius } => {
                dataset["backgroundColor"] = json!(colors);
                dataset["borderRadius"] = json!(radius);
            }
        }

        let legend = match self.legend {
            Legend::Hidden => json!({ "display": false }),
            Legend::Bottom { padding, point_style } => json!({
                "position": "bottom",
                "labels": { "padding": padding, "usePointStyle": point_style }
            }),
        };
        let mut options = json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": legend }
        });
        if let Some(axes) = self.axes {
            let grid = json!({ "display": axes.grid_lines });
            options["scales"] = json!({
                "y": { "beginAtZero": axes.begin_at_zero, "grid": grid },
                "x": { "grid": grid }
            });
        }

        json!({
            "type": self.kind,
            "data": { "labels": self.labels, "datasets": [dataset] },
            "options": options
        })
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

fn palette(count: usize) -> Vec<String> {
    PALETTE.iter().take(count).map(|color| (*color).to_owned()).collect()
}

const FLAT_AXES: Axes = Axes { begin_at_zero: true, grid_lines: false };

/// The three dashboard charts with their static datasets.
#[must_use]
pub fn dashboard_charts() -> Vec<ChartSpec> {
    vec![
        ChartSpec {
            mount_id: MARKET_CAP_CHART.to_owned(),
            kind: ChartKind::Doughnut,
            labels: labels(&["USDT", "USDC", "BUSD", "DAI", "Other"]),
            series_label: None,
            values: vec![45.0, 25.0, 15.0, 10.0, 5.0],
            style: SeriesStyle::Segments { colors: palette(5) },
            legend: Legend::Bottom { padding: 20, point_style: true },
            axes: None,
        },
        ChartSpec {
            mount_id: ADOPTION_CHART.to_owned(),
            kind: ChartKind::Line,
            labels: labels(&["2020", "2021", "2022", "2023", "2024", "2025"]),
            series_label: Some("CBDC Projects".to_owned()),
            values: vec![12.0, 25.0, 45.0, 67.0, 78.0, 87.0],
            style: SeriesStyle::Area {
                stroke: "#2196F3".to_owned(),
                fill: "rgba(33, 150, 243, 0.1)".to_owned(),
                tension: 0.4,
            },
            legend: Legend::Hidden,
            axes: Some(FLAT_AXES),
        },
        ChartSpec {
            mount_id: STABLECOIN_CHART.to_owned(),
            kind: ChartKind::Bar,
            labels: labels(&["USDT", "USDC", "BUSD", "DAI"]),
            series_label: Some("Market Cap ($B)".to_owned()),
            values: vec![95.2, 52.8, 15.6, 8.4],
            style: SeriesStyle::Bars { colors: palette(4), radius: 8 },
            legend: Legend::Hidden,
            axes: Some(FLAT_AXES),
        },
    ]
}

/// Drawing collaborator (Chart.js in the browser).
pub trait ChartRenderer {
    fn has_mount(&self, mount_id: &str) -> bool;

    /// # Errors
    ///
    /// Returns an error if the chart could not be constructed.
    fn render(&self, spec: &ChartSpec) -> Result<(), UiError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartInitReport {
    pub rendered: Vec<String>,
    pub absent: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub struct ChartPanel {
    specs: Vec<ChartSpec>,
    built: Vec<String>,
}

impl ChartPanel {
    pub fn new(specs: Vec<ChartSpec>) -> Self {
        Self { specs, built: Vec::new() }
    }

    #[must_use]
    pub fn dashboard() -> Self {
        Self::new(dashboard_charts())
    }

    /// Build every chart whose mount point exists and that is not built yet.
    ///
    /// A failing chart is reported and does not stop the others.
    pub fn initialize_if_present(&mut self, renderer: &dyn ChartRenderer) -> ChartInitReport {
        let mut report = ChartInitReport::default();
        for spec in &self.specs {
            if self.built.contains(&spec.mount_id) {
                continue;
            }
            if !renderer.has_mount(&spec.mount_id) {
                report.absent.push(spec.mount_id.clone());
                continue;
            }
            match renderer.render(spec) {
                Ok(()) => {
                    self.built.push(spec.mount_id.clone());
                    report.rendered.push(spec.mount_id.clone());
                }
                Err(err) => {
                    log::warn!("chart {} failed to render: {err}", spec.mount_id);
                    report.failed.push((spec.mount_id.clone(), err.to_string()));
                }
            }
        }
        report
    }

    #[must_use]
    pub fn built(&self) -> &[String] {
        &self.built
    }
}

/// Mutually exclusive selector buttons bound to one chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartButtonGroup {
    buttons: Vec<String>,
    active: usize,
}

impl ChartButtonGroup {
    /// `buttons` are the `data-chart` values in document order. Returns `None`
    /// for an empty group. Without a valid initial selection the first
    /// button is active.
    pub fn new(buttons: Vec<String>, initially_active: Option<usize>) -> Option<Self> {
        if buttons.is_empty() {
            return None;
        }
        let active = initially_active
            .filter(|index| *index < buttons.len())
            .unwrap_or(0);
        Some(Self { buttons, active })
    }

    /// Activate button `index`, deactivating its siblings. Returns the
    /// selected value.
    pub fn click(&mut self, index: usize) -> Option<&str> {
        let value = self.buttons.get(index)?;
        self.active = index;
        log::debug!("chart selection switched to {value}");
        Some(value)
    }

    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active == index
    }

    #[must_use]
    pub fn selected(&self) -> &str {
        &self.buttons[self.active]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
