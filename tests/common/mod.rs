// Shared in-memory printer service for controller tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use printdeck::{Command, ControlError, FileEntry, PrinterService, PrinterStatus, SessionId};

pub fn status(busy: bool, state: &str) -> PrinterStatus {
    PrinterStatus { busy, state: state.to_string() }
}

pub fn file(id: &str, name: &str) -> FileEntry {
    FileEntry { id: id.to_string(), name: name.to_string() }
}

pub fn transport(msg: &str) -> ControlError {
    ControlError::Transport(msg.to_string())
}

/// Scriptable fake. Status results are consumed in order; once the script is
/// empty the fallback is returned.
pub struct FakeService {
    info_script: Mutex<VecDeque<Result<PrinterStatus, ControlError>>>,
    info_fallback: Mutex<Result<PrinterStatus, ControlError>>,
    info_delay: Mutex<Duration>,
    info_calls: AtomicUsize,
    info_outstanding: AtomicUsize,
    info_max_outstanding: AtomicUsize,

    sessions: Mutex<Result<Option<Vec<SessionId>>, ControlError>>,
    files: Mutex<Result<Option<Vec<FileEntry>>, ControlError>>,
    list_delay: Mutex<Duration>,
    session_calls: AtomicUsize,
    file_calls: AtomicUsize,

    command_result: Mutex<Result<Option<String>, ControlError>>,
    command_delay: Mutex<Duration>,
    commands: Mutex<Vec<(SessionId, Command)>>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            info_script: Mutex::new(VecDeque::new()),
            info_fallback: Mutex::new(Ok(status(false, "IDLE"))),
            info_delay: Mutex::new(Duration::ZERO),
            info_calls: AtomicUsize::new(0),
            info_outstanding: AtomicUsize::new(0),
            info_max_outstanding: AtomicUsize::new(0),
            sessions: Mutex::new(Ok(Some(vec![SessionId::new("s1"), SessionId::new("s2")]))),
            files: Mutex::new(Ok(Some(vec![file("1", "benchy.gcode")]))),
            list_delay: Mutex::new(Duration::ZERO),
            session_calls: AtomicUsize::new(0),
            file_calls: AtomicUsize::new(0),
            command_result: Mutex::new(Ok(Some("ok".to_string()))),
            command_delay: Mutex::new(Duration::ZERO),
            commands: Mutex::new(Vec::new()),
        }
    }
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_info(&self, result: Result<PrinterStatus, ControlError>) {
        self.info_script.lock().unwrap().push_back(result);
    }

    pub fn set_info_fallback(&self, result: Result<PrinterStatus, ControlError>) {
        *self.info_fallback.lock().unwrap() = result;
    }

    pub fn set_info_delay(&self, delay: Duration) {
        *self.info_delay.lock().unwrap() = delay;
    }

    pub fn set_sessions(&self, result: Result<Option<Vec<SessionId>>, ControlError>) {
        *self.sessions.lock().unwrap() = result;
    }

    pub fn set_files(&self, result: Result<Option<Vec<FileEntry>>, ControlError>) {
        *self.files.lock().unwrap() = result;
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = delay;
    }

    pub fn set_command_result(&self, result: Result<Option<String>, ControlError>) {
        *self.command_result.lock().unwrap() = result;
    }

    pub fn set_command_delay(&self, delay: Duration) {
        *self.command_delay.lock().unwrap() = delay;
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub fn max_outstanding_info(&self) -> usize {
        self.info_max_outstanding.load(Ordering::SeqCst)
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn file_calls(&self) -> usize {
        self.file_calls.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<(SessionId, Command)> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrinterService for FakeService {
    async fn printer_info(&self) -> Result<PrinterStatus, ControlError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.info_outstanding.fetch_add(1, Ordering::SeqCst) + 1;
        self.info_max_outstanding.fetch_max(now, Ordering::SeqCst);
        let delay = *self.info_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.info_outstanding.fetch_sub(1, Ordering::SeqCst);
        let scripted = self.info_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.info_fallback.lock().unwrap().clone())
    }

    async fn list_sessions(&self) -> Result<Option<Vec<SessionId>>, ControlError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.sessions.lock().unwrap().clone()
    }

    async fn list_files(&self) -> Result<Option<Vec<FileEntry>>, ControlError> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.files.lock().unwrap().clone()
    }

    async fn send_command(&self, session: &SessionId, command: &Command) -> Result<Option<String>, ControlError> {
        self.commands.lock().unwrap().push((session.clone(), command.clone()));
        let delay = *self.command_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.command_result.lock().unwrap().clone()
    }
}
