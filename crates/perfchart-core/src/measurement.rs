use crate::record::BuildRecord;
use crate::scenario::ScenarioDefinition;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// One scenario value of one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementPoint {
    pub build_timestamp: Option<NaiveDateTime>,
    pub branch_label: Option<String>,
    pub scenario: ScenarioDefinition,
    /// NaN when the source cell is missing or not a number.
    pub value: f64,
}

/// Measurement points grouped by scenario key, in scenario definition order.
///
/// Every scenario passed to [`bucket_by_scenario`] has an entry, possibly empty. Within a
/// bucket, points keep the order of the input builds.
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuckets<'a> {
    buckets: IndexMap<&'static str, Vec<&'a MeasurementPoint>>,
}

impl<'a> ScenarioBuckets<'a> {
    pub fn get(&self, scenario_key: &str) -> &[&'a MeasurementPoint] {
        self.buckets
            .get(scenario_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[&'a MeasurementPoint])> + '_ {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("number regex must compile")
    })
}

/// Reads the leading decimal number of a cell, ignoring whatever follows it (`"12.5 ops"` is
/// `12.5`). Cells that do not start with a number are NaN. Only the spelled-out `Infinity` is
/// accepted as infinite; an exponent overflow such as `1e400` also yields infinity.
pub fn parse_measurement_value(raw: Option<&str>) -> f64 {
    raw.and_then(|s| leading_number_re().find(s.trim_start()))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Expands every record into one point per scenario (record-major, scenario-minor).
pub fn flatten(records: &[BuildRecord], scenarios: &[ScenarioDefinition]) -> Vec<MeasurementPoint> {
    let mut out = Vec::with_capacity(records.len() * scenarios.len());
    for record in records {
        for scenario in scenarios {
            out.push(MeasurementPoint {
                build_timestamp: record.build_timestamp,
                branch_label: record.branch_label.clone(),
                scenario: *scenario,
                value: parse_measurement_value(record.raw_value(scenario.key)),
            });
        }
    }
    tracing::debug!(
        records = records.len(),
        points = out.len(),
        "flattened build records"
    );
    out
}

/// Partitions flattened points by scenario key. No sorting, no deduplication.
pub fn bucket_by_scenario<'a>(
    points: &'a [MeasurementPoint],
    scenarios: &[ScenarioDefinition],
) -> ScenarioBuckets<'a> {
    let mut buckets: IndexMap<&'static str, Vec<&'a MeasurementPoint>> = scenarios
        .iter()
        .map(|s| (s.key, Vec::new()))
        .collect();
    for p in points {
        buckets.entry(p.scenario.key).or_default().push(p);
    }
    ScenarioBuckets { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_value_parsing_is_lenient() {
        assert_eq!(parse_measurement_value(Some("5")), 5.0);
        assert_eq!(parse_measurement_value(Some(" 12.50 ")), 12.5);
        assert!(parse_measurement_value(Some("n/a")).is_nan());
        assert!(parse_measurement_value(Some("")).is_nan());
        assert!(parse_measurement_value(None).is_nan());
    }

    #[test]
    fn measurement_value_reads_the_leading_number_only() {
        assert_eq!(parse_measurement_value(Some("12.5 ops")), 12.5);
        assert_eq!(parse_measurement_value(Some("-3e2x")), -300.0);
        assert_eq!(parse_measurement_value(Some(".5")), 0.5);
        assert_eq!(parse_measurement_value(Some("7.")), 7.0);
        assert!(parse_measurement_value(Some("ops 12")).is_nan());
        assert!(parse_measurement_value(Some("inf")).is_nan());
        assert!(parse_measurement_value(Some("nan")).is_nan());
        assert_eq!(parse_measurement_value(Some("Infinity")), f64::INFINITY);
        assert_eq!(parse_measurement_value(Some("1e400")), f64::INFINITY);
    }
}
