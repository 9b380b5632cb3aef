use chrono::NaiveDateTime;

pub(crate) const TOOLTIP_TIME_FORMAT: &str = "%d-%m %H:%M";
pub(crate) const TICK_DATE_FORMAT: &str = "%d-%m";

/// Formats a measurement with at most one decimal, e.g. `12462.6`, `5`.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let rounded = (v * 10.0).round() / 10.0;
    let s = if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    };
    if s == "-0" { "0".to_string() } else { s }
}

pub fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(TOOLTIP_TIME_FORMAT).to_string())
        .unwrap_or_else(|| "invalid date".to_string())
}

pub fn format_tick_date(ts: NaiveDateTime) -> String {
    ts.format(TICK_DATE_FORMAT).to_string()
}

/// Tooltip text for one point: build time, branch and value.
pub fn tooltip_label(ts: Option<NaiveDateTime>, branch: Option<&str>, value: f64) -> String {
    format!(
        "{} [{}] {}",
        format_timestamp(ts),
        branch.unwrap_or("unknown"),
        format_value(value)
    )
}

/// Number formatting for SVG attributes: round-trippable, without `-0` and float noise.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

/// Like [`fmt`], but writes any non-finite coordinate as `NaN` so anomalous points stay
/// observable in the output.
pub(crate) fn fmt_coord(v: f64) -> String {
    if !v.is_finite() {
        return "NaN".to_string();
    }
    fmt(v)
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_keep_at_most_one_decimal() {
        assert_eq!(format_value(5.0), "5");
        assert_eq!(format_value(12462.62), "12462.6");
        assert_eq!(format_value(0.04), "0");
        assert_eq!(format_value(-0.01), "0");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn tooltip_label_has_time_branch_and_value() {
        let ts = NaiveDateTime::parse_from_str("2012-01-02 10:00", "%Y-%m-%d %H:%M").ok();
        assert_eq!(tooltip_label(ts, Some("main"), 6.0), "02-01 10:00 [main] 6");
        assert_eq!(
            tooltip_label(None, None, f64::NAN),
            "invalid date [unknown] NaN"
        );
    }

    #[test]
    fn attribute_numbers_drop_noise() {
        assert_eq!(fmt(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(fmt(2.0000000001), "2");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt_coord(f64::NAN), "NaN");
        assert_eq!(fmt_coord(f64::NEG_INFINITY), "NaN");
        assert_eq!(fmt(f64::NAN), "0");
    }
}
