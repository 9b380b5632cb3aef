use crate::Result;
use crate::record::PINNED_YEAR;
use serde::{Deserialize, Serialize};

/// d3's `category10` palette.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    /// Vertical gap between two stacked panels.
    pub between: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 150.0,
            right: 100.0,
            top: 100.0,
            bottom: 150.0,
            between: 150.0,
        }
    }
}

/// Everything the chart is parameterized by. Defaults are the fixed values the report ships
/// with; a partial JSON object overrides individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub panel_width: f64,
    pub panel_height: f64,
    pub margins: Margins,
    pub point_radius: f64,
    pub pinned_year: i32,
    pub palette: Vec<String>,
    pub emphasis_color: String,
    pub value_axis_label: String,
    pub tick_count: usize,
    pub data_source: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            panel_width: 1000.0,
            panel_height: 400.0,
            margins: Margins::default(),
            point_radius: 4.0,
            pinned_year: PINNED_YEAR,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            emphasis_color: "red".to_string(),
            value_axis_label: "Operations/s".to_string(),
            tick_count: 10,
            data_source: "data.tsv".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
