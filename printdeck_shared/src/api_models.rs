//! Shared data models for API requests and responses (client/simulator).

use serde::{Deserialize, Serialize};

/// Every response of the printer service is wrapped in `{ "payload": T }`.
///
/// The payload is optional on the wire: an absent or `null` payload means
/// "no data" and is not a transport failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self { payload: Some(payload) }
    }

    pub fn empty() -> Self {
        Self { payload: None }
    }
}

/// Printer status as reported by `/api/printer/info`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrinterInfo {
    /// No print commands allowed while set.
    pub busy: bool,
    /// What the printer is currently doing, e.g. "IDLE" or "PRINTING".
    pub status: String,
}

/// A gcode file known to the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Stable key used by the load command.
    pub id: String,
    /// Display only.
    pub name: String,
}

/// Body of the plain session-scoped commands (start, pause, cancel, ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionCommandRequest {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Body of `/api/command/load`. Uses snake_case keys, unlike the other commands.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoadFileRequest {
    pub session_id: String,
    pub file_id: String,
}

/// Body of a non-2xx response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Agent status values reported in `PrinterInfo::status`.
pub mod agent_status {
    pub const UNKNOWN: &str = "UNKNOWN";
    pub const IDLE: &str = "IDLE";
    pub const READY: &str = "READY";
    pub const PRINTING: &str = "PRINTING";
    pub const PAUSED: &str = "PAUSED";
    pub const AUTO_HOME: &str = "AUTO_HOME";
    pub const LEVEL_BED: &str = "LEVEL_BED";
}
