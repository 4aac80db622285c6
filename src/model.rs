// src/model.rs - Client-side data model
use std::fmt;

use printdeck_shared::PrinterInfo;

pub use printdeck_shared::FileEntry;

/// Opaque session identifier handed out by the printer service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Snapshot of the physical printer. Replaced wholesale on every successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterStatus {
    pub busy: bool,
    pub state: String,
}

impl From<PrinterInfo> for PrinterStatus {
    fn from(info: PrinterInfo) -> Self {
        Self {
            busy: info.busy,
            state: info.status,
        }
    }
}
