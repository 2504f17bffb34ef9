use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Samples handed to the energy integrator ─────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PowerSample {
    pub timestamp: NaiveDateTime,
    pub power_watts: f64,
}

impl PowerSample {
    pub fn new(timestamp: NaiveDateTime, power_watts: f64) -> Self {
        Self { timestamp, power_watts }
    }
}

// ─── SolarEdge wire types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SiteDetailsResponse {
    pub details: SiteDetailsBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetailsBody {
    pub installation_date: String,
    pub last_update_time: String,
}

#[derive(Debug, Deserialize)]
pub struct SitePowerResponse {
    pub power: SitePowerBody,
}

#[derive(Debug, Deserialize)]
pub struct SitePowerBody {
    /// Measurement unit of `values`; absent means W
    #[serde(default)]
    pub unit: Option<String>,
    pub values: Vec<SitePowerValue>,
}

#[derive(Debug, Deserialize)]
pub struct SitePowerValue {
    pub date: String,
    /// The service reports gaps as null
    pub value: Option<f64>,
}

// ─── REST API response types ─────────────────────────────────────────────────

/// Operating range of the monitored site.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SiteDetails {
    pub installation_date: NaiveDate,
    pub last_update: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnergyReport {
    pub filter: String,
    pub samples: usize,
    pub first_sample: Option<NaiveDateTime>,
    pub last_sample: Option<NaiveDateTime>,
    /// Integrated energy, rounded to 3 decimals
    pub energy_kwh: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfilePoint {
    /// Decimal hour of day
    pub hour: f64,
    pub median_watts: f64,
}
