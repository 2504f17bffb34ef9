pub mod observation;
pub mod telemetry;
