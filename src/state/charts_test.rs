use super::*;
use std::cell::RefCell;

struct FakeRenderer {
    mounts: Vec<&'static str>,
    broken: Vec<&'static str>,
    drawn: RefCell<Vec<String>>,
}

impl FakeRenderer {
    fn with_mounts(mounts: Vec<&'static str>) -> Self {
        Self { mounts, broken: Vec::new(), drawn: RefCell::new(Vec::new()) }
    }
}

impl ChartRenderer for FakeRenderer {
    fn has_mount(&self, mount_id: &str) -> bool {
        self.mounts.contains(&mount_id)
    }

    fn render(&self, spec: &ChartSpec) -> Result<(), UiError> {
        if self.broken.contains(&spec.mount_id.as_str()) {
            return Err(UiError::Js("Chart is not defined".to_owned()));
        }
        self.drawn.borrow_mut().push(spec.mount_id.clone());
        Ok(())
    }
}

fn spec(mount_id: &str) -> ChartSpec {
    dashboard_charts()
        .into_iter()
        .find(|spec| spec.mount_id == mount_id)
        .unwrap()
}

// =============================================================
// Static configs
// =============================================================

#[test]
fn catalog_has_three_charts_in_order() {
    let ids: Vec<String> = dashboard_charts().into_iter().map(|spec| spec.mount_id).collect();
    assert_eq!(ids, vec![MARKET_CAP_CHART, ADOPTION_CHART, STABLECOIN_CHART]);
}

#[test]
fn market_cap_doughnut_config() {
    let config = spec(MARKET_CAP_CHART).to_config();
    assert_eq!(config["type"], "doughnut");
    assert_eq!(config["data"]["labels"], json!(["USDT", "USDC", "BUSD", "DAI", "Other"]));
    let dataset = &config["data"]["datasets"][0];
    assert_eq!(dataset["data"], json!([45.0, 25.0, 15.0, 10.0, 5.0]));
    assert_eq!(
        dataset["backgroundColor"],
        json!(["#26A69A", "#2196F3", "#FFC107", "#4CAF50", "#9E9E9E"])
    );
    assert_eq!(dataset["borderWidth"], 0);
    assert_eq!(config["options"]["plugins"]["legend"]["position"], "bottom");
    assert_eq!(config["options"]["plugins"]["legend"]["labels"]["padding"], 20);
    assert_eq!(config["options"]["plugins"]["legend"]["labels"]["usePointStyle"], true);
    assert!(config["options"].get("scales").is_none());
}

#[test]
fn adoption_line_config() {
    let config = spec(ADOPTION_CHART).to_config();
    assert_eq!(config["type"], "line");
    let dataset = &config["data"]["datasets"][0];
    assert_eq!(dataset["label"], "CBDC Projects");
    assert_eq!(dataset["data"], json!([12.0, 25.0, 45.0, 67.0, 78.0, 87.0]));
    assert_eq!(dataset["borderColor"], "#2196F3");
    assert_eq!(dataset["backgroundColor"], "rgba(33, 150, 243, 0.1)");
    assert_eq!(dataset["tension"], 0.4);
    assert_eq!(dataset["fill"], true);
    assert_eq!(config["options"]["plugins"]["legend"]["display"], false);
    assert_eq!(config["options"]["scales"]["y"]["beginAtZero"], true);
    assert_eq!(config["options"]["scales"]["x"]["grid"]["display"], false);
}

#[test]
fn stablecoin_bar_config() {
    let config = spec(STABLECOIN_CHART).to_config();
    assert_eq!(config["type"], "bar");
    let dataset = &config["data"]["datasets"][0];
    assert_eq!(dataset["label"], "Market Cap ($B)");
    assert_eq!(dataset["data"], json!([95.2, 52.8, 15.6, 8.4]));
    assert_eq!(dataset["backgroundColor"], json!(["#26A69A", "#2196F3", "#FFC107", "#4CAF50"]));
    assert_eq!(dataset["borderRadius"], 8);
}

#[test]
fn every_config_is_responsive_without_fixed_aspect() {
    for spec in dashboard_charts() {
        let config = spec.to_config();
        assert_eq!(config["options"]["responsive"], true);
        assert_eq!(config["options"]["maintainAspectRatio"], false);
    }
}

// =============================================================
// ChartPanel
// =============================================================

#[test]
fn only_present_mounts_are_rendered() {
    let renderer = FakeRenderer::with_mounts(vec![ADOPTION_CHART]);
    let mut panel = ChartPanel::dashboard();
    let report = panel.initialize_if_present(&renderer);

    assert_eq!(report.rendered, vec![ADOPTION_CHART.to_owned()]);
    assert_eq!(report.absent, vec![MARKET_CAP_CHART.to_owned(), STABLECOIN_CHART.to_owned()]);
    assert!(report.failed.is_empty());
    assert_eq!(*renderer.drawn.borrow(), vec![ADOPTION_CHART.to_owned()]);
}

#[test]
fn no_mounts_means_no_charts() {
    let renderer = FakeRenderer::with_mounts(Vec::new());
    let mut panel = ChartPanel::dashboard();
    let report = panel.initialize_if_present(&renderer);
    assert!(report.rendered.is_empty());
    assert_eq!(report.absent.len(), 3);
    assert!(panel.built().is_empty());
}

#[test]
fn second_initialization_does_not_duplicate() {
    let renderer = FakeRenderer::with_mounts(vec![MARKET_CAP_CHART, ADOPTION_CHART, STABLECOIN_CHART]);
    let mut panel = ChartPanel::dashboard();
    assert_eq!(panel.initialize_if_present(&renderer).rendered.len(), 3);

    let again = panel.initialize_if_present(&renderer);
    assert!(again.rendered.is_empty());
    assert_eq!(renderer.drawn.borrow().len(), 3);
}

#[test]
fn failing_chart_does_not_block_others() {
    let mut renderer = FakeRenderer::with_mounts(vec![MARKET_CAP_CHART, ADOPTION_CHART, STABLECOIN_CHART]);
    renderer.broken = vec![ADOPTION_CHART];
    let mut panel = ChartPanel::dashboard();
    let report = panel.initialize_if_present(&renderer);

    assert_eq!(report.rendered, vec![MARKET_CAP_CHART.to_owned(), STABLECOIN_CHART.to_owned()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, ADOPTION_CHART);
    assert!(report.failed[0].1.contains("Chart is not defined"));
}

// =============================================================
// ChartButtonGroup
// =============================================================

fn group() -> ChartButtonGroup {
    ChartButtonGroup::new(vec!["7d".to_owned(), "30d".to_owned(), "1y".to_owned()], Some(0)).unwrap()
}

#[test]
fn click_activates_only_clicked_button() {
    let mut group = group();
    assert_eq!(group.click(2), Some("1y"));
    assert!(group.is_active(2));
    assert!(!group.is_active(0));
    assert!(!group.is_active(1));
    assert_eq!(group.selected(), "1y");
}

#[test]
fn clicking_active_button_keeps_it_active() {
    let mut group = group();
    group.click(0);
    assert_eq!(group.active(), 0);
}

#[test]
fn out_of_range_click_is_ignored() {
    let mut group = group();
    group.click(1);
    assert_eq!(group.click(9), None);
    assert_eq!(group.active(), 1);
}

#[test]
fn empty_group_is_rejected() {
    assert!(ChartButtonGroup::new(Vec::new(), None).is_none());
}

#[test]
fn invalid_initial_selection_defaults_to_first() {
    let group = ChartButtonGroup::new(vec!["a".to_owned(), "b".to_owned()], Some(4)).unwrap();
    assert_eq!(group.active(), 0);
    assert_eq!(group.len(), 2);
}

#[test]
fn unmarked_group_starts_on_first_button() {
    let group = ChartButtonGroup::new(vec!["7d".to_owned(), "30d".to_owned()], None).unwrap();
    assert_eq!(group.active(), 0);
    assert!(group.is_active(0));
    assert!(!group.is_active(1));
}
