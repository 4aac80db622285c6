//! Simulated remote printer service.
//!
//! Serves the same routes as the real printer host, backed by an in-memory
//! printer whose jobs finish after a fixed duration.

pub mod api;
pub mod printer;

pub use api::{create_router, Faults, SimState};
pub use printer::{SimConfig, SimError, SimulatedPrinter};
