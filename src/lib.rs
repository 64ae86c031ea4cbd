#[macro_use]
extern crate log;

pub mod compass_state;
pub mod coordinate;
pub mod display;
pub mod heading_filter;
pub mod maps_link;
pub mod settings;
pub mod telemetry;
pub mod telemetry_message;
pub mod telemetry_provider;
