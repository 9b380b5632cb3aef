#![forbid(unsafe_code)]

//! Benchmark history model: loads per-build throughput rows, parses build labels and flattens
//! the six scenario measurements into per-scenario buckets.
//!
//! Everything here is side-effect free except [`RecordSource::fetch`].

pub mod config;
pub mod error;
pub mod measurement;
pub mod record;
pub mod scenario;
pub mod source;

pub use config::{ChartConfig, DEFAULT_PALETTE, Margins};
pub use error::{Error, Result};
pub use measurement::{
    MeasurementPoint, ScenarioBuckets, bucket_by_scenario, flatten, parse_measurement_value,
};
pub use record::{
    BUILD_COLUMN, BuildRecord, PINNED_YEAR, RawRow, parse_branch_label, parse_build_record,
    parse_build_timestamp,
};
pub use scenario::{SCENARIOS, ScenarioDefinition, scenario_by_key};
pub use source::{RecordSource, TsvSource};

use serde::Serialize;

/// A fully loaded benchmark history. Replaced wholesale when new data is loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    pub records: Vec<BuildRecord>,
}

impl Dataset {
    pub fn from_rows(rows: &[RawRow], config: &ChartConfig) -> Self {
        let records: Vec<BuildRecord> = rows
            .iter()
            .map(|row| parse_build_record(row, &SCENARIOS, config.pinned_year))
            .collect();

        let anomalies = records.iter().filter(|r| r.is_anomalous()).count();
        if anomalies > 0 {
            tracing::warn!(
                anomalies,
                records = records.len(),
                "some build labels could not be parsed; their points will render off-scale"
            );
        }
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn anomalous_records(&self) -> impl Iterator<Item = &BuildRecord> {
        self.records.iter().filter(|r| r.is_anomalous())
    }

    /// Flat measurement sequence over all six scenarios.
    pub fn measurements(&self) -> Vec<MeasurementPoint> {
        flatten(&self.records, &SCENARIOS)
    }
}

/// Synchronous variant of [`load_dataset`].
pub fn load_dataset_sync(source: &dyn RecordSource, config: &ChartConfig) -> Result<Dataset> {
    let rows = source.fetch()?;
    Ok(Dataset::from_rows(&rows, config))
}

/// Fetches and parses the whole history. This is the only suspension point of a render.
pub async fn load_dataset(source: &dyn RecordSource, config: &ChartConfig) -> Result<Dataset> {
    load_dataset_sync(source, config)
}
