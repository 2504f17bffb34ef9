use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;

fn default_port() -> u16 { 3000 }
fn default_base_url() -> String { "https://monitoringapi.solaredge.com".to_string() }
fn default_max_attempts() -> u32 { 3 }
fn default_retry_delay_ms() -> u64 { 5_000 }
fn default_standard_offset() -> i32 { -5 }
fn default_daylight_offset() -> i32 { -4 }

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub daylight_saving: DstTable,
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// Geographic site and the panel arrays installed on it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
pub struct SiteConfig {
    /// Decimal degrees, north positive
    pub latitude: f64,
    /// Decimal degrees, east positive
    pub longitude: f64,
    pub arrays: Vec<PanelArray>,
}

/// Toronto rooftop with a south-ish and an east-ish roof face.
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: 43.656278,
            longitude: -79.44037,
            arrays: vec![
                PanelArray {
                    name: "south".to_string(),
                    tilt_deg: 37.0,
                    azimuth_deg: 165.0,
                    panel_count: 12,
                },
                PanelArray {
                    name: "east".to_string(),
                    tilt_deg: 33.75,
                    azimuth_deg: 75.0,
                    panel_count: 9,
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
pub struct PanelArray {
    pub name: String,
    /// Slope from horizontal (degrees)
    pub tilt_deg: f64,
    /// Azimuthal rotation from true north, clockwise (degrees)
    pub azimuth_deg: f64,
    pub panel_count: u32,
}

/// Daylight-saving window for one calendar year: `start <= date < end`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
pub struct DstPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Explicit per-year daylight-saving table for the modeled region.
///
/// No DST rules are inferred; a year that is not listed cannot be observed.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
pub struct DstTable {
    #[serde(default = "default_standard_offset")]
    pub standard_offset: i32,
    #[serde(default = "default_daylight_offset")]
    pub daylight_offset: i32,
    pub periods: BTreeMap<i32, DstPeriod>,
}

impl DstTable {
    pub fn period(&self, year: i32) -> Option<&DstPeriod> {
        self.periods.get(&year)
    }

    /// Adds or replaces the window for `year`.
    pub fn insert(&mut self, year: i32, start: NaiveDate, end: NaiveDate) {
        self.periods.insert(year, DstPeriod { start, end });
    }
}

/// Eastern time, 2017 through 2020.
impl Default for DstTable {
    fn default() -> Self {
        let mut table = DstTable {
            standard_offset: default_standard_offset(),
            daylight_offset: default_daylight_offset(),
            periods: BTreeMap::new(),
        };
        for (year, (sm, sd), (em, ed)) in [
            (2017, (3, 12), (11, 5)),
            (2018, (3, 11), (11, 4)),
            (2019, (3, 10), (11, 3)),
            (2020, (3, 8), (11, 1)),
        ] {
            if let (Some(start), Some(end)) = (
                NaiveDate::from_ymd_opt(year, sm, sd),
                NaiveDate::from_ymd_opt(year, em, ed),
            ) {
                table.insert(year, start, end);
            }
        }
        table
    }
}

/// SolarEdge monitoring API credentials.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelemetryConfig {
    pub site_id: String,
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            daylight_saving: DstTable::default(),
            telemetry: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let site = &self.site;
        if !(-90.0..=90.0).contains(&site.latitude) {
            return Err(ConfigError::Invalid(format!("latitude {} outside [-90, 90]", site.latitude)));
        }
        if !(-180.0..=180.0).contains(&site.longitude) {
            return Err(ConfigError::Invalid(format!("longitude {} outside [-180, 180]", site.longitude)));
        }
        for array in &site.arrays {
            if !(0.0..=90.0).contains(&array.tilt_deg) {
                return Err(ConfigError::Invalid(format!(
                    "array '{}' tilt {} outside [0, 90]",
                    array.name, array.tilt_deg
                )));
            }
        }
        let dst = &self.daylight_saving;
        for (label, offset) in [("standard", dst.standard_offset), ("daylight", dst.daylight_offset)] {
            if offset <= -13 || offset >= 15 {
                return Err(ConfigError::Invalid(format!("{label} offset {offset} outside (-13, 15)")));
            }
        }
        for (year, period) in &dst.periods {
            if period.start.year() != *year || period.end.year() != *year {
                return Err(ConfigError::Invalid(format!(
                    "daylight-saving {year}: {} to {} is not within the year",
                    period.start, period.end
                )));
            }
            if period.start >= period.end {
                return Err(ConfigError::Invalid(format!("daylight-saving {year}: start is not before end")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_toronto_site() {
        let config = Config::default();
        assert_eq!(config.site.arrays.len(), 2);
        assert_eq!(config.site.arrays[0].panel_count, 12);
        assert_eq!(config.site.arrays[1].tilt_deg, 33.75);
        let p2020 = config.daylight_saving.period(2020).unwrap();
        assert_eq!(p2020.start, NaiveDate::from_ymd_opt(2020, 3, 8).unwrap());
        assert_eq!(p2020.end, NaiveDate::from_ymd_opt(2020, 11, 1).unwrap());
        assert!(config.daylight_saving.period(2021).is_none());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = Config::from_json(r#"{ "server": { "port": 8080 } }"#).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site, SiteConfig::default());
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn dst_years_load_from_string_keys() {
        let json = r#"{
            "daylight_saving": {
                "periods": { "2021": { "start": "2021-03-14", "end": "2021-11-07" } }
            },
            "telemetry": { "site_id": "123456", "api_key": "k" }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.daylight_saving.standard_offset, -5);
        assert!(config.daylight_saving.period(2021).is_some());
        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.max_attempts, 3);
        assert_eq!(telemetry.base_url, "https://monitoringapi.solaredge.com");
    }

    #[test]
    fn rejects_inverted_dst_window() {
        let json = r#"{
            "daylight_saving": {
                "periods": { "2021": { "start": "2021-11-07", "end": "2021-03-14" } }
            }
        }"#;
        assert!(matches!(Config::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_dst_window_outside_its_year() {
        let json = r#"{
            "daylight_saving": {
                "periods": { "2021": { "start": "2022-03-13", "end": "2022-11-06" } }
            }
        }"#;
        assert!(matches!(Config::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unusable_utc_offsets() {
        for (standard, daylight) in [(-13, -4), (-5, 15), (20, 21)] {
            let json = format!(
                r#"{{ "daylight_saving": {{ "standard_offset": {standard}, "daylight_offset": {daylight}, "periods": {{}} }} }}"#
            );
            assert!(
                matches!(Config::from_json(&json), Err(ConfigError::Invalid(_))),
                "offsets {standard}/{daylight} should be refused"
            );
        }
        let json = r#"{ "daylight_saving": { "standard_offset": -12, "daylight_offset": 14, "periods": {} } }"#;
        assert!(Config::from_json(json).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let json = r#"{ "site": { "latitude": 123.0, "longitude": 0.0, "arrays": [] } }"#;
        assert!(matches!(Config::from_json(json), Err(ConfigError::Invalid(_))));
    }
}
