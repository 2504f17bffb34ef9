use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Full derivation of the sun's position and the panel response for one instant.
///
/// Built once by `compute_observation` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observation {
    pub timestamp: NaiveDateTime,

    // ── Time normalizer ─────────────────────────────────────────────────────
    /// Days since Jan 1 (0 for Jan 1)
    pub day_of_year: i64,
    /// Local clock hour with minutes as a fraction; seconds ignored
    pub hour_of_day: f64,
    /// Whole hours from UTC after daylight-saving resolution
    pub utc_offset: i32,

    // ── Solar time ──────────────────────────────────────────────────────────
    /// Equation of time (minutes)
    pub equation_of_time_min: f64,
    /// Local standard time meridian (degrees)
    pub local_standard_meridian_deg: f64,
    /// Time correction factor (minutes)
    pub time_correction_min: f64,
    /// Local solar time (hours), not wrapped to [0, 24)
    pub local_solar_time_h: f64,

    // ── Geometry ────────────────────────────────────────────────────────────
    pub declination_deg: f64,
    pub hour_angle_deg: f64,
    /// Negative when the sun is below the horizon
    pub elevation_deg: f64,
    /// Clockwise from true north, in [0, 360)
    pub azimuth_deg: f64,

    // ── Atmosphere ──────────────────────────────────────────────────────────
    pub air_mass: f64,
    /// Transmitted fraction of the 1.353 kW/m² solar constant
    pub attenuation: f64,

    // ── Panels ──────────────────────────────────────────────────────────────
    pub arrays: Vec<ArrayEfficiency>,
    pub total_efficiency: f64,
}

impl Observation {
    pub fn is_day(&self) -> bool {
        self.elevation_deg > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArrayEfficiency {
    pub name: String,
    pub panel_count: u32,
    /// Geometric incidence factor, clamped at 0
    pub incidence: f64,
    /// attenuation × panel_count × incidence
    pub efficiency: f64,
}
