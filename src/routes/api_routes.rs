use axum::{routing::get, Router};
use crate::controllers::energy_controller::{get_details, get_energy, get_profile};
use crate::controllers::observation_controller::{get_observation, get_site, get_sweep};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` or `State<Arc<Config>>` via
/// `FromRef<AppState>`; a single `.with_state(state)` covers both.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/site",               get(get_site))
        .route("/observation",        get(get_observation))
        .route("/observation/sweep",  get(get_sweep))
        .route("/telemetry/details",  get(get_details))
        .route("/energy",             get(get_energy))
        .route("/energy/profile",     get(get_profile))
        .with_state(state)
}
