// src/command.rs - Operator commands and their outcomes
use std::fmt;

use printdeck_shared::endpoints;

use crate::error::ControlError;

/// Session-scoped commands the operator can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    Start,
    Pause,
    Cancel,
    AutoHome,
    LevelBedTest,
    /// Clears a stuck busy flag on the agent.
    Unlock,
    Load,
}

impl CommandKind {
    pub const ALL: [CommandKind; 7] = [
        CommandKind::Start,
        CommandKind::Pause,
        CommandKind::Cancel,
        CommandKind::AutoHome,
        CommandKind::LevelBedTest,
        CommandKind::Unlock,
        CommandKind::Load,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            CommandKind::Start => endpoints::COMMAND_START,
            CommandKind::Pause => endpoints::COMMAND_PAUSE,
            CommandKind::Cancel => endpoints::COMMAND_CANCEL,
            CommandKind::AutoHome => endpoints::COMMAND_AUTOHOME,
            CommandKind::LevelBedTest => endpoints::COMMAND_LEVEL_BED_TEST,
            CommandKind::Unlock => endpoints::COMMAND_UNLOCK,
            CommandKind::Load => endpoints::COMMAND_LOAD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CommandKind::Start => "start",
            CommandKind::Pause => "pause",
            CommandKind::Cancel => "cancel",
            CommandKind::AutoHome => "auto-home",
            CommandKind::LevelBedTest => "level-test",
            CommandKind::Unlock => "unlock",
            CommandKind::Load => "load-file",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An operator intent, before it is bound to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Cancel,
    AutoHome,
    LevelBedTest,
    Unlock,
    Load { file_id: String },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Start => CommandKind::Start,
            Command::Pause => CommandKind::Pause,
            Command::Cancel => CommandKind::Cancel,
            Command::AutoHome => CommandKind::AutoHome,
            Command::LevelBedTest => CommandKind::LevelBedTest,
            Command::Unlock => CommandKind::Unlock,
            Command::Load { .. } => CommandKind::Load,
        }
    }
}

/// Result of one dispatched command, kept for display until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub kind: CommandKind,
    pub ok: bool,
    pub message: Option<String>,
    /// Failure kind when `ok` is false.
    pub error: Option<ControlError>,
    /// Correlates the outcome with log lines.
    pub request_id: Option<String>,
    pub at: chrono::DateTime<chrono::Utc>,
}

impl CommandOutcome {
    pub fn from_result(
        kind: CommandKind,
        request_id: Option<String>,
        result: &Result<Option<String>, ControlError>,
    ) -> Self {
        match result {
            Ok(message) => Self {
                kind,
                ok: true,
                message: message.clone(),
                error: None,
                request_id,
                at: chrono::Utc::now(),
            },
            Err(e) => Self {
                kind,
                ok: false,
                message: Some(e.to_string()),
                error: Some(e.clone()),
                request_id,
                at: chrono::Utc::now(),
            },
        }
    }
}
