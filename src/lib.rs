//! Sun position and photovoltaic efficiency for a fixed site, plus energy
//! totals from SolarEdge power telemetry.
//!
//! The model is a pure function of a local clock timestamp, the site
//! configuration and a daylight-saving table:
//!
//! ```
//! use solar_efficiency::config::{DstTable, SiteConfig};
//! use solar_efficiency::services::solar_algorithm::compute_observation;
//!
//! let obs = compute_observation("2020-06-21 12:00:00", &SiteConfig::default(), &DstTable::default()).unwrap();
//! assert!(obs.elevation_deg > 0.0);
//! assert!(obs.total_efficiency > 0.0);
//! ```

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;

pub use config::{Config, DstTable, PanelArray, SiteConfig};
pub use error::{ConfigError, SolarError, TelemetryError};
pub use models::observation::{ArrayEfficiency, Observation};
pub use services::solar_algorithm::compute_observation;
