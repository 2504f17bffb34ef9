use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::TelemetryError;
use crate::models::telemetry::{EnergyReport, PowerSample, ProfilePoint, SiteDetails};
use crate::services::energy::{self, DateFilter};
use crate::services::telemetry_service::TelemetryClient;
use crate::shared_state::AppState;

/// Retrieval range plus an optional calendar filter applied afterwards.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnergyQuery {
    /// First day to retrieve (defaults to the installation date)
    pub start: Option<NaiveDate>,
    /// Last day to retrieve, inclusive (defaults to the last update)
    pub end: Option<NaiveDate>,
    /// Year, or a month when given alone and ≤ 12
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

fn error_json(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(serde_json::json!({ "error": message.to_string() }))).into_response()
}

pub fn telemetry_error_response(err: TelemetryError) -> Response {
    let status = match err {
        TelemetryError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        TelemetryError::InvalidDate(_) => StatusCode::BAD_REQUEST,
        TelemetryError::Http(_) | TelemetryError::Status { .. } | TelemetryError::InvalidSample(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    error_json(status, err)
}

fn client(state: &AppState) -> Result<&TelemetryClient, Response> {
    state
        .telemetry
        .as_ref()
        .ok_or_else(|| telemetry_error_response(TelemetryError::NotConfigured))
}

async fn load_filtered(state: &AppState, query: &EnergyQuery) -> Result<(Vec<PowerSample>, DateFilter), Response> {
    let filter = DateFilter::from_parts(query.year, query.month, query.day)
        .ok_or_else(|| error_json(StatusCode::BAD_REQUEST, "invalid year/month/day selection"))?;
    let client = client(state)?;
    let samples = match (query.start, query.end) {
        (Some(start), Some(end)) => client.power_samples(start, end).await,
        (None, None) => client.full_history().await,
        _ => return Err(error_json(StatusCode::BAD_REQUEST, "start and end must be given together")),
    }
    .map_err(|e| {
        tracing::warn!(error = %e, "telemetry retrieval failed");
        telemetry_error_response(e)
    })?;
    Ok((samples, filter))
}

/// GET /api/telemetry/details
/// Operating range reported by the monitoring service
#[utoipa::path(
    get,
    path = "/api/telemetry/details",
    responses(
        (status = 200, description = "Installation and last update dates", body = SiteDetails),
        (status = 502, description = "Monitoring service failed"),
        (status = 503, description = "Telemetry not configured")
    )
)]
pub async fn get_details(State(state): State<AppState>) -> Response {
    let client = match client(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match client.site_details().await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => telemetry_error_response(e),
    }
}

/// GET /api/energy
/// Energy produced over a window, integrated with Simpson's rule
#[utoipa::path(
    get,
    path = "/api/energy",
    params(EnergyQuery),
    responses(
        (status = 200, description = "Integrated energy", body = EnergyReport),
        (status = 400, description = "Invalid dates or filter"),
        (status = 502, description = "Monitoring service failed"),
        (status = 503, description = "Telemetry not configured")
    )
)]
pub async fn get_energy(State(state): State<AppState>, Query(query): Query<EnergyQuery>) -> Response {
    match load_filtered(&state, &query).await {
        Ok((samples, filter)) => (StatusCode::OK, Json(energy::energy_report(&samples, filter))).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/energy/profile
/// Median power by time of day over the filtered samples
#[utoipa::path(
    get,
    path = "/api/energy/profile",
    params(EnergyQuery),
    responses(
        (status = 200, description = "Median power per time of day", body = Vec<ProfilePoint>),
        (status = 400, description = "Invalid dates or filter"),
        (status = 502, description = "Monitoring service failed"),
        (status = 503, description = "Telemetry not configured")
    )
)]
pub async fn get_profile(State(state): State<AppState>, Query(query): Query<EnergyQuery>) -> Response {
    match load_filtered(&state, &query).await {
        Ok((samples, filter)) => {
            let selected = energy::filter_samples(&samples, filter);
            (StatusCode::OK, Json(energy::hourly_median_profile(&selected))).into_response()
        }
        Err(resp) => resp,
    }
}
