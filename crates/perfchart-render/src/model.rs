use crate::color::BranchPalette;
use crate::format::{fmt, format_tick_date, tooltip_label};
use crate::layout::{ChartLayout, layout_for_config};
use crate::scale::{ChartScales, LinearScale, build_scales};
use chrono::NaiveDateTime;
use perfchart_core::{ChartConfig, Dataset, SCENARIOS, ScenarioDefinition, bucket_by_scenario};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickModel {
    /// Pixel position along the axis, relative to the panel origin.
    pub position: f64,
    pub label: String,
}

/// Everything needed to draw and hover one measurement, computed up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointModel {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub branch: Option<String>,
    pub color: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelModel {
    pub scenario: ScenarioDefinition,
    pub vertical_offset: f64,
    pub value_domain: (f64, f64),
    pub x_ticks: Vec<TickModel>,
    pub y_ticks: Vec<TickModel>,
    pub points: Vec<PointModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub branch: String,
    pub color: String,
}

/// Render-ready description of the whole chart. Pure data; nothing here touches a surface.
#[derive(Debug, Clone, Serialize)]
pub struct ChartModel {
    pub layout: ChartLayout,
    pub time_domain: Option<(NaiveDateTime, NaiveDateTime)>,
    pub panels: Vec<PanelModel>,
    pub legend: Vec<LegendEntry>,
    pub value_axis_label: String,
    pub emphasis_color: String,
    pub point_radius: f64,
}

impl ChartModel {
    pub fn point_count(&self) -> usize {
        self.panels.iter().map(|p| p.points.len()).sum()
    }

    pub fn panel(&self, scenario_key: &str) -> Option<&PanelModel> {
        self.panels.iter().find(|p| p.scenario.key == scenario_key)
    }
}

fn x_ticks(scales: &ChartScales, count: usize) -> Vec<TickModel> {
    scales
        .time
        .ticks(count)
        .into_iter()
        .map(|ts| TickModel {
            position: scales.time.scale(Some(ts)),
            label: format_tick_date(ts),
        })
        .collect()
}

/// Runs the pure half of the pipeline: flatten, bucket, scale, lay out and colour.
pub fn build_chart_model(dataset: &Dataset, config: &ChartConfig) -> ChartModel {
    let points = dataset.measurements();
    let buckets = bucket_by_scenario(&points, &SCENARIOS);
    let scales = build_scales(
        &dataset.records,
        &buckets,
        config.panel_width,
        config.panel_height,
    );
    let layout = layout_for_config(SCENARIOS.len(), config);
    let palette = BranchPalette::from_records(&dataset.records, &config.palette);
    let time_ticks = x_ticks(&scales, config.tick_count);

    let panels = SCENARIOS
        .iter()
        .zip(&layout.panels)
        .map(|(scenario, panel_layout)| {
            let bucket = buckets.get(scenario.key);
            let y = scales.value_scale(scenario.key).cloned().unwrap_or_else(|| {
                LinearScale::from_values(std::iter::empty::<f64>(), (config.panel_height, 0.0))
            });

            let points = bucket
                .iter()
                .map(|p| {
                    let branch = p.branch_label.as_deref();
                    PointModel {
                        x: scales.time.scale(p.build_timestamp),
                        y: y.scale(p.value),
                        value: p.value,
                        branch: p.branch_label.clone(),
                        color: palette.color_for(branch).to_string(),
                        tooltip: tooltip_label(p.build_timestamp, branch, p.value),
                    }
                })
                .collect();

            let y_ticks = y
                .ticks(config.tick_count)
                .into_iter()
                .map(|v| TickModel {
                    position: y.scale(v),
                    label: fmt(v),
                })
                .collect();

            PanelModel {
                scenario: *scenario,
                vertical_offset: panel_layout.vertical_offset,
                value_domain: y.domain(),
                x_ticks: time_ticks.clone(),
                y_ticks,
                points,
            }
        })
        .collect();

    let legend = palette
        .entries()
        .map(|(branch, color)| LegendEntry {
            branch: branch.to_string(),
            color: color.to_string(),
        })
        .collect();

    let model = ChartModel {
        layout,
        time_domain: scales.time.domain(),
        panels,
        legend,
        value_axis_label: config.value_axis_label.clone(),
        emphasis_color: config.emphasis_color.clone(),
        point_radius: config.point_radius,
    };
    tracing::debug!(
        panels = model.panels.len(),
        points = model.point_count(),
        width = model.layout.width,
        height = model.layout.height,
        "built chart model"
    );
    model
}
