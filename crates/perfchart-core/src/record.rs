use crate::scenario::ScenarioDefinition;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// One row of the tabular source, column name to raw cell text, in header order.
pub type RawRow = IndexMap<String, String>;

/// Column holding the build label, e.g. `01-01 10:00[main]`.
pub const BUILD_COLUMN: &str = "build";

/// Year assumed for every build timestamp.
///
/// Build labels only carry day, month, hour and minute, so the year of the benchmark history is
/// pinned. Histories spanning a year boundary will be ordered incorrectly on the time axis.
pub const PINNED_YEAR: i32 = 2012;

/// Width of the `dd-mm HH:MM` prefix of a build label.
const TIMESTAMP_PREFIX_LEN: usize = 11;
const TIMESTAMP_FORMAT: &str = "%Y-%d-%m %H:%M";

/// A single benchmark run, as parsed from one row.
///
/// `build_timestamp` and `branch_label` are `None` when the build label does not have the
/// expected shape. Such records are kept so the anomaly stays visible in the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRecord {
    pub build_label: String,
    pub build_timestamp: Option<NaiveDateTime>,
    pub branch_label: Option<String>,
    pub raw_values: IndexMap<String, String>,
}

impl BuildRecord {
    pub fn raw_value(&self, scenario_key: &str) -> Option<&str> {
        self.raw_values.get(scenario_key).map(String::as_str)
    }

    pub fn is_anomalous(&self) -> bool {
        self.build_timestamp.is_none() || self.branch_label.is_none()
    }
}

fn branch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]").expect("branch regex must compile"))
}

/// Parses the timestamp prefix of a build label against the pinned year.
pub fn parse_build_timestamp(label: &str, year: i32) -> Option<NaiveDateTime> {
    let prefix = label.get(..TIMESTAMP_PREFIX_LEN)?;
    NaiveDateTime::parse_from_str(&format!("{year}-{prefix}"), TIMESTAMP_FORMAT).ok()
}

/// Extracts the text inside the first `[...]` of a build label.
pub fn parse_branch_label(label: &str) -> Option<String> {
    branch_re()
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Converts one raw row into a [`BuildRecord`]. Never fails: unparseable parts become `None`.
pub fn parse_build_record(
    row: &RawRow,
    scenarios: &[ScenarioDefinition],
    year: i32,
) -> BuildRecord {
    let build_label = row.get(BUILD_COLUMN).cloned().unwrap_or_default();
    let build_timestamp = parse_build_timestamp(&build_label, year);
    let branch_label = parse_branch_label(&build_label);

    let raw_values = scenarios
        .iter()
        .filter_map(|s| row.get(s.key).map(|v| (s.key.to_string(), v.clone())))
        .collect();

    let record = BuildRecord {
        build_label,
        build_timestamp,
        branch_label,
        raw_values,
    };
    if record.is_anomalous() {
        tracing::debug!(label = %record.build_label, "build label does not match `dd-mm HH:MM[branch]`");
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::SCENARIOS;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn timestamp_uses_day_month_order_and_pinned_year() {
        let ts = parse_build_timestamp("02-03 14:05[main]", 2012).unwrap();
        assert_eq!(ts.to_string(), "2012-03-02 14:05:00");
    }

    #[test]
    fn timestamp_rejects_short_or_malformed_prefix() {
        assert!(parse_build_timestamp("02-03", 2012).is_none());
        assert!(parse_build_timestamp("garbage-label[x]", 2012).is_none());
        assert!(parse_build_timestamp("31-02 10:00[main]", 2012).is_none());
    }

    #[test]
    fn branch_is_first_bracketed_segment() {
        assert_eq!(
            parse_branch_label("01-01 10:00[1.8-maint][extra]").as_deref(),
            Some("1.8-maint")
        );
        assert_eq!(parse_branch_label("01-01 10:00").as_deref(), None);
        assert_eq!(parse_branch_label("01-01 10:00[]").as_deref(), Some(""));
    }

    #[test]
    fn record_keeps_only_scenario_columns() {
        let r = parse_build_record(
            &row(&[
                ("build", "01-01 10:00[main]"),
                ("avgr", "5"),
                ("notes", "ignored"),
            ]),
            &SCENARIOS,
            PINNED_YEAR,
        );
        assert_eq!(r.branch_label.as_deref(), Some("main"));
        assert_eq!(r.raw_value("avgr"), Some("5"));
        assert_eq!(r.raw_value("avgw"), None);
        assert!(!r.raw_values.contains_key("notes"));
        assert!(!r.is_anomalous());
    }

    #[test]
    fn malformed_label_yields_anomalous_record() {
        let r = parse_build_record(&row(&[("build", "nightly"), ("avgr", "1")]), &SCENARIOS, 2012);
        assert!(r.build_timestamp.is_none());
        assert!(r.branch_label.is_none());
        assert!(r.is_anomalous());
    }
}
