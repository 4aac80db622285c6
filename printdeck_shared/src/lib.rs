// printdeck_shared: wire models shared by the operator client and the simulator

pub mod api_models;
pub mod endpoints;

pub use api_models::*;
