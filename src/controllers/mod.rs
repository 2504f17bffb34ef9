pub mod energy_controller;
pub mod observation_controller;
