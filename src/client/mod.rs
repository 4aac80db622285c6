//! Access to the remote printer service.
//!
//! The controller only talks to [`PrinterService`]; [`HttpPrinterService`] is the
//! production implementation.

pub mod http;

use async_trait::async_trait;

use crate::command::Command;
use crate::error::ControlError;
use crate::model::{FileEntry, PrinterStatus, SessionId};

pub use http::HttpPrinterService;

/// Logical operations of the printer service.
///
/// List operations return `Ok(None)` when the service answered without a
/// payload. Commands return the optional server message.
#[async_trait]
pub trait PrinterService: Send + Sync + 'static {
    async fn printer_info(&self) -> Result<PrinterStatus, ControlError>;

    async fn list_sessions(&self) -> Result<Option<Vec<SessionId>>, ControlError>;

    async fn list_files(&self) -> Result<Option<Vec<FileEntry>>, ControlError>;

    /// Send exactly one command scoped to `session`.
    async fn send_command(&self, session: &SessionId, command: &Command) -> Result<Option<String>, ControlError>;
}
