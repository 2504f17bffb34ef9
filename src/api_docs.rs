use utoipa::OpenApi;
use crate::config;
use crate::controllers::{energy_controller, observation_controller};
use crate::models::{observation, telemetry};

#[derive(OpenApi)]
#[openapi(
    paths(
        observation_controller::get_site,
        observation_controller::get_observation,
        observation_controller::get_sweep,
        energy_controller::get_details,
        energy_controller::get_energy,
        energy_controller::get_profile
    ),
    components(
        schemas(
            observation::Observation,
            observation::ArrayEfficiency,
            observation_controller::SiteResponse,
            config::SiteConfig,
            config::PanelArray,
            config::DstTable,
            config::DstPeriod,
            telemetry::SiteDetails,
            telemetry::EnergyReport,
            telemetry::ProfilePoint
        )
    ),
    tags(
        (name = "solar-efficiency", description = "Solar position and panel efficiency API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/site",
            "/api/observation",
            "/api/observation/sweep",
            "/api/telemetry/details",
            "/api/energy",
            "/api/energy/profile",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
