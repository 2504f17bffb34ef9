use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::services::telemetry_service::TelemetryClient;

/// Read-only state shared by every request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no monitoring credentials are configured
    pub telemetry: Option<TelemetryClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let telemetry = match config.telemetry.clone().map(TelemetryClient::new) {
            Some(Ok(client)) => Some(client),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "telemetry disabled");
                None
            }
            None => None,
        };
        Self {
            config: Arc::new(config),
            telemetry,
        }
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
