// printdeck: operator-side controller for remote 3D-printer sessions

pub mod client;
pub mod command;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod model;

pub use client::{HttpPrinterService, PrinterService};
pub use command::{Command, CommandKind, CommandOutcome};
pub use controller::{ControllerOptions, ControllerView, SessionController};
pub use error::ControlError;
pub use model::{FileEntry, PrinterStatus, SessionId};
