// Dashboard view model and HTML status page

use askama::Template;
use serde::Serialize;

use crate::models::{MonitorSnapshot, SystemStatus};

pub const PAGE_TITLE: &str = "Sentinel Ops: AI Supervisor";
pub const EMPTY_ALERTS_MESSAGE: &str = "No critical actions taken yet...";
pub const ACTUAL_SERIES_NAME: &str = "Actual CPU";
pub const PREDICTED_SERIES_NAME: &str = "AI Prediction";

const NORMAL_COLOR: &str = "#4caf50";
const CRITICAL_COLOR: &str = "#ff4d4d";
const ACTUAL_COLOR: &str = "#8884d8";
const PREDICTED_COLOR: &str = "#82ca9d";

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 300.0;
const CHART_PADDING: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerView {
    pub label: String,
    pub color: &'static str,
}

impl BannerView {
    pub fn for_status(status: SystemStatus) -> Self {
        match status {
            SystemStatus::Normal => Self {
                label: "SYSTEM STATUS: NORMAL".to_string(),
                color: NORMAL_COLOR,
            },
            SystemStatus::Critical => Self {
                label: "SYSTEM STATUS: CRITICAL - SCALING UP".to_string(),
                color: CRITICAL_COLOR,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesView {
    pub name: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
}

/// Two line series sharing the x axis of poll timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub labels: Vec<String>,
    pub actual: SeriesView,
    pub predicted: SeriesView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub title: &'static str,
    pub banner: BannerView,
    pub chart: ChartView,
    /// Newest first.
    pub alerts: Vec<String>,
    /// Set only while the alert list is empty.
    pub empty_alerts_message: Option<&'static str>,
}

impl DashboardView {
    pub fn from_snapshot(snapshot: &MonitorSnapshot) -> Self {
        let labels = snapshot.samples.iter().map(|s| s.timestamp.clone()).collect();
        let actual = snapshot.samples.iter().map(|s| s.actual_value).collect();
        let predicted = snapshot.samples.iter().map(|s| s.predicted_value).collect();
        Self {
            title: PAGE_TITLE,
            banner: BannerView::for_status(snapshot.status),
            chart: ChartView {
                labels,
                actual: SeriesView {
                    name: ACTUAL_SERIES_NAME,
                    color: ACTUAL_COLOR,
                    values: actual,
                },
                predicted: SeriesView {
                    name: PREDICTED_SERIES_NAME,
                    color: PREDICTED_COLOR,
                    values: predicted,
                },
            },
            alerts: snapshot.alerts.clone(),
            empty_alerts_message: snapshot.alerts.is_empty().then_some(EMPTY_ALERTS_MESSAGE),
        }
    }
}

/// Pre-scaled SVG geometry for the chart; the template only places these values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlot {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub label_y: f64,
    pub legend_x: f64,
    pub max_label: String,
    pub min_label: String,
    pub actual_points: String,
    pub predicted_points: String,
    pub first_label: Option<String>,
    pub last_label: Option<String>,
}

impl ChartPlot {
    pub fn from_chart(chart: &ChartView) -> Self {
        let (min, max) = value_range(chart);
        Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            top: CHART_PADDING,
            bottom: CHART_HEIGHT - CHART_PADDING,
            left: CHART_PADDING,
            right: CHART_WIDTH - CHART_PADDING,
            label_y: CHART_HEIGHT - 8.0,
            legend_x: CHART_PADDING + 120.0,
            max_label: format!("{:.2}", max),
            min_label: format!("{:.2}", min),
            actual_points: polyline_points(&chart.actual.values, min, max),
            predicted_points: polyline_points(&chart.predicted.values, min, max),
            first_label: chart.labels.first().cloned(),
            last_label: chart.labels.last().cloned(),
        }
    }
}

/// Full status page. `refresh_secs` drives a meta refresh so the page follows the poll loop.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub view: DashboardView,
    pub plot: ChartPlot,
    pub refresh_secs: u64,
}

impl DashboardTemplate {
    pub fn new(view: DashboardView, refresh_secs: u64) -> Self {
        let plot = ChartPlot::from_chart(&view.chart);
        Self {
            view,
            plot,
            refresh_secs: refresh_secs.max(1),
        }
    }
}

/// Shared y range across both series; a flat or empty chart gets a unit-wide range.
fn value_range(chart: &ChartView) -> (f64, f64) {
    let mut values = chart
        .actual
        .values
        .iter()
        .chain(chart.predicted.values.iter())
        .copied()
        .filter(|v| v.is_finite());
    let Some(first) = values.next() else {
        return (0.0, 1.0);
    };
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

fn polyline_points(values: &[f64], min: f64, max: f64) -> String {
    let plot_w = CHART_WIDTH - 2.0 * CHART_PADDING;
    let plot_h = CHART_HEIGHT - 2.0 * CHART_PADDING;
    let step = if values.len() > 1 {
        plot_w / (values.len() - 1) as f64
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = CHART_PADDING + step * i as f64;
            let y = CHART_PADDING + plot_h * (1.0 - (v - min) / (max - min));
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
