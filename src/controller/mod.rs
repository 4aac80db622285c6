//! Session & command controller.
//!
//! [`SessionController`] owns the selected session and composes the status
//! poller, the command dispatcher and the two list caches. Data flows in through
//! selection changes, poll ticks and list refreshes; commands flow out to the
//! printer service.

pub mod catalog;
pub mod dispatcher;
pub mod poller;
pub mod selection;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::client::PrinterService;
use crate::command::{Command, CommandKind, CommandOutcome};
use crate::error::ControlError;
use crate::model::{FileEntry, SessionId};

pub use catalog::{FileCatalog, ListCache, ListDisplay, ListView, SessionRegistry};
pub use dispatcher::{CommandDispatcher, PreparedCommand};
pub use poller::{StatusPoller, StatusView};
pub use selection::{Selection, SelectionHandle};

/// Reference status poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub poll_interval: Duration,
    /// Issue the initial session and file list loads on start.
    pub load_lists_on_start: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            load_lists_on_start: true,
        }
    }
}

/// Everything the display layer renders, captured at one point in time.
#[derive(Debug, Clone)]
pub struct ControllerView {
    pub selected: Option<SessionId>,
    pub status: StatusView,
    pub sessions: ListView<SessionId>,
    pub files: ListView<FileEntry>,
    pub outcomes: BTreeMap<CommandKind, CommandOutcome>,
}

pub struct SessionController {
    selection: Selection,
    poller: StatusPoller,
    dispatcher: CommandDispatcher,
    sessions: SessionRegistry,
    files: FileCatalog,
    closed: Arc<AtomicBool>,
}

impl SessionController {
    /// Mount the controller: start polling and kick off the list loads.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(service: Arc<dyn PrinterService>, options: ControllerOptions) -> Self {
        let closed = Arc::new(AtomicBool::new(false));
        let selection = Selection::new();
        let dispatcher = CommandDispatcher::new(service.clone(), selection.handle(), closed.clone());
        let sessions = SessionRegistry::sessions(service.clone(), closed.clone());
        let files = FileCatalog::files(service.clone(), closed.clone());
        let poller = StatusPoller::start(service, options.poll_interval);

        if options.load_lists_on_start {
            let sessions = sessions.clone();
            tokio::spawn(async move {
                let _ = sessions.load().await;
            });
            let files = files.clone();
            tokio::spawn(async move {
                let _ = files.load().await;
            });
        }

        Self {
            selection,
            poller,
            dispatcher,
            sessions,
            files,
            closed,
        }
    }

    /// Select `id`. It does not have to appear in the cached session list.
    pub fn select_session(&self, id: impl Into<SessionId>) {
        let id = id.into();
        tracing::info!("Selected session {}", id);
        self.selection.set(id);
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.selection.current()
    }

    pub fn selection(&self) -> SelectionHandle {
        self.selection.handle()
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn files(&self) -> &FileCatalog {
        &self.files
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        self.dispatcher.dispatch(command).await
    }

    pub async fn refresh_sessions(&self) -> Result<Vec<SessionId>, ControlError> {
        self.sessions.refresh().await
    }

    pub async fn refresh_files(&self) -> Result<Vec<FileEntry>, ControlError> {
        self.files.refresh().await
    }

    pub fn refresh_status(&self) {
        self.poller.poll_now();
    }

    pub async fn view(&self) -> ControllerView {
        ControllerView {
            selected: self.current_session(),
            status: self.poller.view().await,
            sessions: self.sessions.view().await,
            files: self.files.view().await,
            outcomes: self.dispatcher.outcomes().await,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Tear down: stop polling and stop applying late results to state.
    pub async fn shutdown(&mut self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::info!("Shutting down session controller");
        self.poller.stop().await;
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        // The poller aborts its own task on drop.
        self.closed.store(true, Ordering::Release);
    }
}
