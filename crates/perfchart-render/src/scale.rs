use chrono::NaiveDateTime;
use indexmap::IndexMap;
use perfchart_core::{BuildRecord, ScenarioBuckets};
use serde::Serialize;

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

fn to_ms(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

fn from_ms(ms: i64) -> Option<NaiveDateTime> {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Maps build timestamps onto the horizontal pixel range.
///
/// The domain spans every parseable timestamp of the dataset. With no timestamp at all the scale
/// pins everything to the start of the range; a missing timestamp maps to NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeScale {
    domain: Option<(NaiveDateTime, NaiveDateTime)>,
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: Option<(NaiveDateTime, NaiveDateTime)>, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn from_timestamps(
        timestamps: impl IntoIterator<Item = NaiveDateTime>,
        range: (f64, f64),
    ) -> Self {
        let domain = timestamps.into_iter().fold(None, |acc, ts| match acc {
            None => Some((ts, ts)),
            Some((lo, hi)) => Some((ts.min(lo), ts.max(hi))),
        });
        Self { domain, range }
    }

    pub fn domain(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, ts: Option<NaiveDateTime>) -> f64 {
        let Some(ts) = ts else {
            return f64::NAN;
        };
        let (r0, r1) = self.range;
        let Some((d0, d1)) = self.domain else {
            return r0;
        };
        let (lo, hi) = (to_ms(d0), to_ms(d1));
        if hi <= lo {
            return r0 + (r1 - r0) / 2.0;
        }
        let t = (to_ms(ts) - lo) as f64 / (hi - lo) as f64;
        r0 + t * (r1 - r0)
    }

    /// Tick instants aligned to a fixed-duration interval chosen to yield about `count` ticks.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        let Some((d0, d1)) = self.domain else {
            return Vec::new();
        };
        let (lo, hi) = (to_ms(d0), to_ms(d1));
        if count == 0 {
            return Vec::new();
        }
        if hi <= lo {
            return vec![d0];
        }

        let step = tick_interval_ms(lo, hi, count);
        let mut out = Vec::new();
        let mut cur = lo.div_euclid(step) * step;
        if cur < lo {
            cur += step;
        }
        while cur <= hi {
            if let Some(ts) = from_ms(cur) {
                out.push(ts);
            }
            cur += step;
        }
        out
    }
}

fn tick_interval_ms(lo: i64, hi: i64, count: usize) -> i64 {
    const INTERVALS: [i64; 13] = [
        MS_PER_MINUTE,
        5 * MS_PER_MINUTE,
        15 * MS_PER_MINUTE,
        30 * MS_PER_MINUTE,
        MS_PER_HOUR,
        3 * MS_PER_HOUR,
        6 * MS_PER_HOUR,
        12 * MS_PER_HOUR,
        MS_PER_DAY,
        2 * MS_PER_DAY,
        MS_PER_WEEK,
        2 * MS_PER_WEEK,
        4 * MS_PER_WEEK,
    ];

    let target = (hi - lo) as f64 / count as f64;
    let i = INTERVALS
        .iter()
        .position(|d| *d as f64 >= target)
        .unwrap_or(INTERVALS.len());
    if i == 0 {
        return INTERVALS[0];
    }
    if i == INTERVALS.len() {
        let weeks = (target / MS_PER_WEEK as f64).ceil().max(1.0) as i64;
        return weeks * MS_PER_WEEK;
    }
    let (d0, d1) = (INTERVALS[i - 1] as f64, INTERVALS[i] as f64);
    if target / d0 < d1 / target {
        INTERVALS[i - 1]
    } else {
        INTERVALS[i]
    }
}

/// Maps a scenario's values onto the vertical pixel range, anchored at zero.
///
/// Construct with an inverted range (`(panel_height, 0.0)`) so larger values are drawn higher.
/// Without a usable maximum (empty or all-NaN bucket, or a maximum of zero) every finite value
/// sits on the zero baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearScale {
    upper: Option<f64>,
    range: (f64, f64),
}

impl LinearScale {
    pub fn from_values(values: impl IntoIterator<Item = f64>, range: (f64, f64)) -> Self {
        let upper = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));
        Self { upper, range }
    }

    /// `[0, max]`, or `[0, 0]` when the bucket has no finite value.
    pub fn domain(&self) -> (f64, f64) {
        (0.0, self.upper.unwrap_or(0.0))
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.upper
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn is_degenerate(&self) -> bool {
        !self.upper.is_some_and(|u| u != 0.0)
    }

    /// Non-finite values map to NaN so they render as anomalies rather than off-scale points.
    pub fn scale(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let (r0, r1) = self.range;
        match self.upper {
            Some(upper) if upper != 0.0 => r0 + (value / upper) * (r1 - r0),
            _ => r0,
        }
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        if self.is_degenerate() {
            return vec![0.0];
        }
        let (d0, d1) = self.domain();
        nice_ticks(d0, d1, count)
    }
}

/// Round-number ticks over `[start, stop]`, following d3-array's `ticks`.
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
        let step = (stop - start) / count;
        if !step.is_finite() || step == 0.0 {
            return None;
        }
        let power = step.log10().floor();
        let error = step / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        let (i1, i2, inc) = if power < 0.0 {
            let inc = 10f64.powf(-power) / factor;
            let mut i1 = (start * inc).round() as i64;
            let mut i2 = (stop * inc).round() as i64;
            if (i1 as f64) / inc < start {
                i1 += 1;
            }
            if (i2 as f64) / inc > stop {
                i2 -= 1;
            }
            (i1, i2, -inc)
        } else {
            let inc = 10f64.powf(power) * factor;
            let mut i1 = (start / inc).round() as i64;
            let mut i2 = (stop / inc).round() as i64;
            if (i1 as f64) * inc < start {
                i1 += 1;
            }
            if (i2 as f64) * inc > stop {
                i2 -= 1;
            }
            (i1, i2, inc)
        };

        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        if !inc.is_finite() || inc == 0.0 {
            return None;
        }
        Some((i1, i2, inc))
    }

    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (a, b) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(a, b, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let value = |i: i64| {
        if inc < 0.0 {
            i as f64 / -inc
        } else {
            i as f64 * inc
        }
    };
    let mut out: Vec<f64> = (i1..=i2).map(value).collect();
    if reverse {
        out.reverse();
    }
    out
}

/// The shared time scale plus one magnitude scale per scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ChartScales {
    pub time: TimeScale,
    pub values: IndexMap<&'static str, LinearScale>,
}

impl ChartScales {
    pub fn value_scale(&self, scenario_key: &str) -> Option<&LinearScale> {
        self.values.get(scenario_key)
    }
}

/// Builds the horizontal scale from all records and each vertical scale from its own bucket only.
pub fn build_scales(
    records: &[BuildRecord],
    buckets: &ScenarioBuckets<'_>,
    panel_width: f64,
    panel_height: f64,
) -> ChartScales {
    let time = TimeScale::from_timestamps(
        records.iter().filter_map(|r| r.build_timestamp),
        (0.0, panel_width),
    );
    let values = buckets
        .iter()
        .map(|(key, bucket)| {
            let scale =
                LinearScale::from_values(bucket.iter().map(|p| p.value), (panel_height, 0.0));
            if scale.is_degenerate() {
                tracing::debug!(scenario = key, "scenario has no usable maximum");
            }
            (key, scale)
        })
        .collect();
    ChartScales { time, values }
}
