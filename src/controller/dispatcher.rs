//! Sends operator commands against the selected session.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::selection::SelectionHandle;
use crate::client::PrinterService;
use crate::command::{Command, CommandKind, CommandOutcome};
use crate::error::ControlError;
use crate::model::SessionId;

/// A command bound to the session it will be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    pub session: SessionId,
    pub command: Command,
}

/// Gatekeeper between operator intents and the printer service.
///
/// Unrelated command kinds are not serialized against each other. The service
/// decides whether a command is legal in the printer's current state.
#[derive(Clone)]
pub struct CommandDispatcher {
    service: Arc<dyn PrinterService>,
    selection: SelectionHandle,
    outcomes: Arc<RwLock<BTreeMap<CommandKind, CommandOutcome>>>,
    closed: Arc<AtomicBool>,
}

impl CommandDispatcher {
    pub fn new(service: Arc<dyn PrinterService>, selection: SelectionHandle, closed: Arc<AtomicBool>) -> Self {
        Self {
            service,
            selection,
            outcomes: Arc::new(RwLock::new(BTreeMap::new())),
            closed,
        }
    }

    /// Bind `command` to the current selection without touching the network.
    pub fn prepare(&self, command: Command) -> Result<PreparedCommand, ControlError> {
        let session = self.selection.current().ok_or(ControlError::NoSessionSelected)?;
        Ok(PreparedCommand { session, command })
    }

    /// Send one command and record its outcome for display.
    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        let kind = command.kind();
        let (request_id, result) = match self.prepare(command) {
            Ok(prepared) => {
                let request_id = uuid::Uuid::new_v4().to_string();
                let result = self.send(&request_id, &prepared).await;
                (Some(request_id), result)
            }
            Err(e) => {
                tracing::warn!("Rejected {} locally: {}", kind, e);
                (None, Err(e))
            }
        };
        let outcome = CommandOutcome::from_result(kind, request_id, &result);
        if !self.closed.load(Ordering::Acquire) {
            self.outcomes.write().await.insert(kind, outcome.clone());
        }
        outcome
    }

    async fn send(&self, request_id: &str, prepared: &PreparedCommand) -> Result<Option<String>, ControlError> {
        let kind = prepared.command.kind();
        tracing::info!(request_id, session = %prepared.session, "Sending {} command", kind);
        let result = self.service.send_command(&prepared.session, &prepared.command).await;
        match &result {
            Ok(message) => tracing::info!(
                request_id,
                "{} accepted: {}",
                kind,
                message.as_deref().unwrap_or("-")
            ),
            Err(e) => tracing::warn!(request_id, "{} failed: {}", kind, e),
        }
        result
    }

    pub async fn start_print(&self) -> CommandOutcome {
        self.dispatch(Command::Start).await
    }

    pub async fn pause_print(&self) -> CommandOutcome {
        self.dispatch(Command::Pause).await
    }

    pub async fn cancel_print(&self) -> CommandOutcome {
        self.dispatch(Command::Cancel).await
    }

    pub async fn auto_home(&self) -> CommandOutcome {
        self.dispatch(Command::AutoHome).await
    }

    pub async fn print_level_test(&self) -> CommandOutcome {
        self.dispatch(Command::LevelBedTest).await
    }

    pub async fn unlock(&self) -> CommandOutcome {
        self.dispatch(Command::Unlock).await
    }

    pub async fn load_file(&self, file_id: impl Into<String>) -> CommandOutcome {
        self.dispatch(Command::Load { file_id: file_id.into() }).await
    }

    pub async fn last_outcome(&self, kind: CommandKind) -> Option<CommandOutcome> {
        self.outcomes.read().await.get(&kind).cloned()
    }

    pub async fn outcomes(&self) -> BTreeMap<CommandKind, CommandOutcome> {
        self.outcomes.read().await.clone()
    }
}
