// src/console.rs - Line-oriented operator console
use std::fmt::Write as _;
use std::future::Future;

use thiserror::Error;

use crate::command::{Command, CommandOutcome};
use crate::controller::{ControllerView, ListDisplay, ListView, StatusView};
use crate::model::{FileEntry, SessionId};

pub const HELP: &str = "\
commands:
  status                      show printer status and selection
  sessions | files            show the cached lists
  refresh [sessions|files|status]
  select <session>            choose the active session
  start | pause | cancel      print control
  home | level | unlock       auto-home, level-bed test, clear busy flag
  load <file-id>              load a gcode file into the session
  help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTarget {
    All,
    Sessions,
    Files,
    Status,
}

/// One parsed operator input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Status,
    Sessions,
    Files,
    Refresh(RefreshTarget),
    Select(SessionId),
    Send(Command),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("cannot refresh '{0}'")]
    UnknownTarget(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(ParseError::Empty)?;
        let arg = words.next();
        let cmd = match verb.to_ascii_lowercase().as_str() {
            "status" | "info" => ConsoleCommand::Status,
            "sessions" => ConsoleCommand::Sessions,
            "files" | "gcodes" => ConsoleCommand::Files,
            "refresh" => ConsoleCommand::Refresh(match arg {
                None => RefreshTarget::All,
                Some("sessions") => RefreshTarget::Sessions,
                Some("files") => RefreshTarget::Files,
                Some("status") => RefreshTarget::Status,
                Some(other) => return Err(ParseError::UnknownTarget(other.to_string())),
            }),
            "select" | "use" => ConsoleCommand::Select(SessionId::new(arg.ok_or(ParseError::MissingArgument("select"))?)),
            "start" | "print" => ConsoleCommand::Send(Command::Start),
            "pause" => ConsoleCommand::Send(Command::Pause),
            "cancel" | "stop" => ConsoleCommand::Send(Command::Cancel),
            "home" | "autohome" => ConsoleCommand::Send(Command::AutoHome),
            "level" | "leveltest" => ConsoleCommand::Send(Command::LevelBedTest),
            "unlock" => ConsoleCommand::Send(Command::Unlock),
            "load" => ConsoleCommand::Send(Command::Load {
                file_id: arg.ok_or(ParseError::MissingArgument("load"))?.to_string(),
            }),
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}

pub fn render_status(selected: Option<&SessionId>, status: &StatusView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Selected session: {}",
        selected.map(SessionId::as_str).unwrap_or("None")
    );
    match &status.latest_status {
        Some(s) => {
            let busy = if s.busy {
                "Printer is currently busy"
            } else {
                "Printer is currently not busy"
            };
            let _ = writeln!(out, "Status: {}", s.state);
            let _ = write!(out, "{}", busy);
        }
        None => {
            let _ = write!(out, "Status: unknown");
        }
    }
    if status.is_stale {
        let _ = write!(
            out,
            "\n[stale] {}",
            status.last_error.as_deref().unwrap_or("last status poll failed")
        );
    }
    out
}

fn render_list<T>(title: &str, view: &ListView<T>, line: impl Fn(&T) -> String) -> String {
    let mut out = format!("{}:", title);
    match view.display() {
        ListDisplay::NotLoaded => out.push_str("\n  not loaded"),
        ListDisplay::Loading => out.push_str("\n  loading..."),
        ListDisplay::NoData => out.push_str("\n  No data"),
        ListDisplay::Error(e) => {
            let _ = write!(out, "\n  error: {}", e);
        }
        ListDisplay::Items(items) => {
            for item in items {
                let _ = write!(out, "\n  {}", line(item));
            }
        }
    }
    if let (Some(_), Some(e)) = (&view.items, &view.last_error) {
        let _ = write!(out, "\n  [refresh failed] {}", e);
    }
    out
}

pub fn render_sessions(view: &ListView<SessionId>, selected: Option<&SessionId>) -> String {
    render_list("Available sessions", view, |id| {
        if Some(id) == selected {
            format!("* {}", id)
        } else {
            format!("  {}", id)
        }
    })
}

pub fn render_files(view: &ListView<FileEntry>) -> String {
    render_list("Available files", view, |f| format!("{}  {}", f.id, f.name))
}

/// Run `work` unless `interrupt` fires first, in which case `work` is dropped.
pub async fn until_interrupted<T>(work: impl Future<Output = T>, interrupt: impl Future) -> Option<T> {
    tokio::select! {
        _ = interrupt => None,
        out = work => Some(out),
    }
}

pub fn render_outcome(outcome: &CommandOutcome) -> String {
    match (outcome.ok, outcome.message.as_deref()) {
        (true, Some(msg)) => format!("{}: ok ({})", outcome.kind, msg),
        (true, None) => format!("{}: ok", outcome.kind),
        (false, msg) => format!("{}: {}", outcome.kind, msg.unwrap_or("failed")),
    }
}

pub fn render_view(view: &ControllerView) -> String {
    let mut out = render_status(view.selected.as_ref(), &view.status);
    for outcome in view.outcomes.values() {
        let _ = write!(out, "\nlast {}", render_outcome(outcome));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use crate::error::ControlError;
    use crate::model::PrinterStatus;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_abandons_slow_work() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            1
        };
        let got = until_interrupted(slow, tokio::time::sleep(Duration::from_secs(1))).await;
        assert_eq!(got, None);

        let quick = async { 2 };
        let got = until_interrupted(quick, std::future::pending::<()>()).await;
        assert_eq!(got, Some(2));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("select s2"), Ok(ConsoleCommand::Select(SessionId::new("s2"))));
        assert_eq!(ConsoleCommand::parse("  HOME "), Ok(ConsoleCommand::Send(Command::AutoHome)));
        assert_eq!(
            ConsoleCommand::parse("load 7"),
            Ok(ConsoleCommand::Send(Command::Load { file_id: "7".to_string() }))
        );
        assert_eq!(ConsoleCommand::parse("refresh files"), Ok(ConsoleCommand::Refresh(RefreshTarget::Files)));
        assert_eq!(ConsoleCommand::parse("refresh"), Ok(ConsoleCommand::Refresh(RefreshTarget::All)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ConsoleCommand::parse("   "), Err(ParseError::Empty));
        assert_eq!(ConsoleCommand::parse("select"), Err(ParseError::MissingArgument("select")));
        assert_eq!(ConsoleCommand::parse("load"), Err(ParseError::MissingArgument("load")));
        assert!(matches!(ConsoleCommand::parse("launch"), Err(ParseError::Unknown(_))));
        assert!(matches!(ConsoleCommand::parse("refresh disk"), Err(ParseError::UnknownTarget(_))));
    }

    #[test]
    fn test_render_stale_status_keeps_last_state() {
        let view = StatusView {
            latest_status: Some(PrinterStatus { busy: true, state: "printing".to_string() }),
            is_stale: true,
            last_error: Some("Transport error: operation timed out".to_string()),
            last_updated: None,
        };
        let text = render_status(None, &view);
        assert!(text.contains("Selected session: None"));
        assert!(text.contains("Status: printing"));
        assert!(text.contains("Printer is currently busy"));
        assert!(text.contains("[stale] Transport error: operation timed out"));
    }

    #[test]
    fn test_render_files_no_data_vs_error() {
        let empty = ListView { items: Some(vec![]), loading: false, last_error: None };
        assert!(render_files(&empty).contains("No data"));
        let failed: ListView<FileEntry> = ListView {
            items: None,
            loading: false,
            last_error: Some("Transport error: refused".to_string()),
        };
        let text = render_files(&failed);
        assert!(text.contains("error: Transport error: refused"));
        assert!(!text.contains("No data"));

        let fresh: ListView<FileEntry> = ListView::default();
        let text = render_files(&fresh);
        assert!(text.contains("not loaded"));
        assert!(!text.contains("No data"));
    }

    #[test]
    fn test_render_no_session_outcome() {
        let outcome = CommandOutcome::from_result(CommandKind::Start, None, &Err(ControlError::NoSessionSelected));
        assert_eq!(render_outcome(&outcome), "start: Session not selected");
    }
}
