//! Time normalizer: calendar timestamp → day-of-year, decimal hour, UTC offset.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::config::DstTable;
use crate::error::SolarError;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Clock reading of a timestamp, before any solar correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalClock {
    pub timestamp: NaiveDateTime,
    pub day_of_year: i64,
    pub hour_of_day: f64,
    pub utc_offset: i32,
}

/// Parses `YYYY-MM-DD HH:MM[:SS]` (a `T` separator is accepted too).
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, SolarError> {
    let trimmed = input.trim();
    let mut last_err = None;
    for fmt in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, fmt) {
            Ok(ts) => return Ok(ts),
            Err(e) => last_err = Some(e),
        }
    }
    Err(match last_err {
        Some(e) => SolarError::parse(input, e),
        None => SolarError::parse(input, "empty input"),
    })
}

/// Days elapsed since Jan 1 of the same year.
pub fn day_of_year(date: NaiveDate) -> i64 {
    date.ordinal0() as i64
}

/// Hour plus minutes as a fraction; seconds do not contribute.
pub fn decimal_hour(ts: &NaiveDateTime) -> f64 {
    ts.hour() as f64 + ts.minute() as f64 / 60.0
}

/// Daylight offset when `start <= date < end`, standard offset otherwise.
pub fn resolve_utc_offset(date: NaiveDate, table: &DstTable) -> Result<i32, SolarError> {
    let period = table
        .period(date.year())
        .ok_or(SolarError::Configuration(date.year()))?;
    if date >= period.start && date < period.end {
        Ok(table.daylight_offset)
    } else {
        Ok(table.standard_offset)
    }
}

impl LocalClock {
    pub fn at(timestamp: NaiveDateTime, table: &DstTable) -> Result<Self, SolarError> {
        let date = timestamp.date();
        Ok(LocalClock {
            timestamp,
            day_of_year: day_of_year(date),
            hour_of_day: decimal_hour(&timestamp),
            utc_offset: resolve_utc_offset(date, table)?,
        })
    }
}

pub fn normalize(input: &str, table: &DstTable) -> Result<LocalClock, SolarError> {
    LocalClock::at(parse_timestamp(input)?, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn jan_first_is_day_zero() {
        let clock = normalize("2019-01-01 00:00:00", &DstTable::default()).unwrap();
        assert_eq!(clock.day_of_year, 0);
        assert_eq!(clock.hour_of_day, 0.0);
    }

    #[test]
    fn leap_year_dec_31_is_day_365() {
        assert_eq!(day_of_year(date(2020, 12, 31)), 365);
        assert_eq!(day_of_year(date(2019, 12, 31)), 364);
    }

    #[test]
    fn seconds_are_ignored() {
        let ts = parse_timestamp("2020-06-21 13:45:59").unwrap();
        assert_eq!(decimal_hour(&ts), 13.75);
    }

    #[test]
    fn accepts_iso_separator() {
        let a = parse_timestamp("2020-06-21T12:00:00").unwrap();
        let b = parse_timestamp("2020-06-21 12:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seconds_may_be_omitted() {
        let short = parse_timestamp("2020-06-21 12:30").unwrap();
        assert_eq!(short, parse_timestamp("2020-06-21 12:30:00").unwrap());
        assert_eq!(decimal_hour(&short), 12.5);
        assert!(parse_timestamp("2020-06-21T07:15").is_ok());
    }

    #[test]
    fn hour_24_is_rejected() {
        assert!(matches!(parse_timestamp("2020-06-21 24:00"), Err(SolarError::Parse { .. })));
    }

    #[test]
    fn malformed_timestamps_are_parse_errors() {
        for bad in ["", "2020-06-21", "2020-13-01 00:00:00", "2019-02-29 10:00:00", "noon"] {
            assert!(
                matches!(parse_timestamp(bad), Err(SolarError::Parse { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn dst_window_is_half_open() {
        let table = DstTable::default();
        assert_eq!(resolve_utc_offset(date(2020, 3, 7), &table), Ok(-5));
        assert_eq!(resolve_utc_offset(date(2020, 3, 8), &table), Ok(-4));
        assert_eq!(resolve_utc_offset(date(2020, 10, 31), &table), Ok(-4));
        assert_eq!(resolve_utc_offset(date(2020, 11, 1), &table), Ok(-5));
    }

    #[test]
    fn missing_year_is_a_configuration_error() {
        let err = normalize("2024-06-21 12:00:00", &DstTable::default()).unwrap_err();
        assert_eq!(err, SolarError::Configuration(2024));
    }

    #[test]
    fn table_can_be_extended() {
        let mut table = DstTable::default();
        table.insert(2024, date(2024, 3, 10), date(2024, 11, 3));
        let clock = normalize("2024-07-01 09:30:00", &table).unwrap();
        assert_eq!(clock.utc_offset, -4);
        assert_eq!(clock.hour_of_day, 9.5);
    }
}
