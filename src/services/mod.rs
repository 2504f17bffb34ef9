pub mod clock;
pub mod energy;
pub mod solar_algorithm;
pub mod telemetry_service;
