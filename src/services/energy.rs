use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, Timelike};

use crate::models::telemetry::{EnergyReport, PowerSample, ProfilePoint};

// ─── Calendar filters ────────────────────────────────────────

/// Calendar slice of a sample series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    All,
    Year(i32),
    /// The same month across every year
    Month(u32),
    YearMonth(i32, u32),
    Day(NaiveDate),
}

impl DateFilter {
    /// Builds a filter from optional year / month / day selectors.
    ///
    /// A lone selector greater than 12 is read as a year, otherwise as a month.
    /// A day needs both year and month.
    pub fn from_parts(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<Self> {
        match (year, month, day) {
            (None, None, None) => Some(DateFilter::All),
            (Some(y), None, None) if y > 12 => Some(DateFilter::Year(y)),
            (Some(m), None, None) if (1..=12).contains(&m) => Some(DateFilter::Month(m as u32)),
            (None, Some(m), None) if (1..=12).contains(&m) => Some(DateFilter::Month(m)),
            (Some(y), Some(m), None) if (1..=12).contains(&m) => Some(DateFilter::YearMonth(y, m)),
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d).map(DateFilter::Day),
            _ => None,
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            DateFilter::All => true,
            DateFilter::Year(y) => date.year() == y,
            DateFilter::Month(m) => date.month() == m,
            DateFilter::YearMonth(y, m) => date.year() == y && date.month() == m,
            DateFilter::Day(d) => date == d,
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::All => write!(f, "all"),
            DateFilter::Year(y) => write!(f, "year {y}"),
            DateFilter::Month(m) => write!(f, "month {m}"),
            DateFilter::YearMonth(y, m) => write!(f, "{y}-{m:02}"),
            DateFilter::Day(d) => write!(f, "{d}"),
        }
    }
}

pub fn filter_samples(samples: &[PowerSample], filter: DateFilter) -> Vec<PowerSample> {
    samples
        .iter()
        .filter(|s| filter.matches(s.timestamp.date()))
        .copied()
        .collect()
}

// ─── Integration ─────────────────────────────────────────────

/// Composite Simpson's rule over consecutive triplets, in kWh.
///
/// Each odd index `i` with a right neighbour closes the panel
/// `(i-1, i, i+1)`; spacing may be irregular. With an even sample
/// count the trailing point has no panel and is left out.
pub fn simpson_energy_kwh(samples: &[PowerSample]) -> f64 {
    let mut watt_hours = 0.0;
    let n = samples.len();
    for i in (1..n.saturating_sub(1)).step_by(2) {
        let (left, mid, right) = (&samples[i - 1], &samples[i], &samples[i + 1]);
        let span_h = (right.timestamp - left.timestamp).num_seconds() as f64 / 3600.0;
        let mean = (left.power_watts + 4.0 * mid.power_watts + right.power_watts) / 6.0;
        watt_hours += span_h * mean;
    }
    watt_hours / 1000.0
}

pub fn energy_report(samples: &[PowerSample], filter: DateFilter) -> EnergyReport {
    let selected = filter_samples(samples, filter);
    let energy = simpson_energy_kwh(&selected);
    EnergyReport {
        filter: filter.to_string(),
        samples: selected.len(),
        first_sample: selected.first().map(|s| s.timestamp),
        last_sample: selected.last().map(|s| s.timestamp),
        energy_kwh: (energy * 1000.0).round() / 1000.0,
    }
}

// ─── Daily profile ───────────────────────────────────────────

/// Median power for every time-of-day present in the samples.
pub fn hourly_median_profile(samples: &[PowerSample]) -> Vec<ProfilePoint> {
    let mut by_second: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for s in samples {
        by_second
            .entry(s.timestamp.num_seconds_from_midnight())
            .or_default()
            .push(s.power_watts);
    }
    by_second
        .into_iter()
        .map(|(second, mut values)| ProfilePoint {
            hour: second as f64 / 3600.0,
            median_watts: median(&mut values),
        })
        .collect()
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
