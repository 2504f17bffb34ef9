use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{Config, DstTable, SiteConfig};
use crate::error::SolarError;
use crate::models::observation::Observation;
use crate::services::solar_algorithm;

fn default_step_minutes() -> u32 { 15 }

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ObservationQuery {
    /// Local clock time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SweepQuery {
    pub date: NaiveDate,
    /// Minutes between observations (1–720)
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SiteResponse {
    pub site: SiteConfig,
    pub daylight_saving: DstTable,
}

pub fn solar_error_response(err: SolarError) -> Response {
    let status = match err {
        SolarError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SolarError::Range(_) | SolarError::Parse { .. } => StatusCode::BAD_REQUEST,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

/// GET /api/site
/// Site coordinates, panel arrays and daylight-saving table
#[utoipa::path(
    get,
    path = "/api/site",
    responses(
        (status = 200, description = "Configured site", body = SiteResponse)
    )
)]
pub async fn get_site(State(config): State<Arc<Config>>) -> impl IntoResponse {
    Json(SiteResponse {
        site: config.site.clone(),
        daylight_saving: config.daylight_saving.clone(),
    })
}

/// GET /api/observation
/// Sun position and panel efficiency at one local clock time
///
/// Fails with 400 on malformed or out-of-range input and 422 when the
/// daylight-saving table does not cover the year.
#[utoipa::path(
    get,
    path = "/api/observation",
    params(ObservationQuery),
    responses(
        (status = 200, description = "Derived observation", body = Observation),
        (status = 400, description = "Malformed timestamp or value out of range"),
        (status = 422, description = "Year missing from daylight-saving table")
    )
)]
pub async fn get_observation(
    State(config): State<Arc<Config>>,
    Query(query): Query<ObservationQuery>,
) -> Response {
    match solar_algorithm::compute_observation(&query.timestamp, &config.site, &config.daylight_saving) {
        Ok(observation) => (StatusCode::OK, Json(observation)).into_response(),
        Err(e) => {
            tracing::debug!(timestamp = %query.timestamp, error = %e, "observation rejected");
            solar_error_response(e)
        }
    }
}

/// GET /api/observation/sweep
/// Observations across one day at a fixed step
#[utoipa::path(
    get,
    path = "/api/observation/sweep",
    params(SweepQuery),
    responses(
        (status = 200, description = "Observations from 00:00 to 24:00", body = Vec<Observation>),
        (status = 400, description = "Step out of range"),
        (status = 422, description = "Year missing from daylight-saving table")
    )
)]
pub async fn get_sweep(
    State(config): State<Arc<Config>>,
    Query(query): Query<SweepQuery>,
) -> Response {
    match solar_algorithm::sweep_day(query.date, query.step_minutes, &config.site, &config.daylight_saving) {
        Ok(observations) => (StatusCode::OK, Json(observations)).into_response(),
        Err(e) => solar_error_response(e),
    }
}
