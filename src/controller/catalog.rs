//! Read-through caches for the session and file lists.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::RwLock;

use crate::client::PrinterService;
use crate::error::ControlError;
use crate::model::{FileEntry, SessionId};

type FetchFn<T> = dyn Fn() -> BoxFuture<'static, Result<Option<Vec<T>>, ControlError>> + Send + Sync;
type InFlight<T> = Shared<BoxFuture<'static, Result<Vec<T>, ControlError>>>;

/// Cached list as seen by the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<T> {
    /// `None` until the first successful load.
    pub items: Option<Vec<T>>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: None,
            loading: false,
            last_error: None,
        }
    }
}

/// How a list should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListDisplay<'a, T> {
    /// No fetch has been issued yet.
    NotLoaded,
    Loading,
    /// Loaded successfully but empty, or the service sent no payload.
    NoData,
    Items(&'a [T]),
    /// Never loaded successfully.
    Error(&'a str),
}

impl<T> ListView<T> {
    pub fn display(&self) -> ListDisplay<'_, T> {
        match (&self.items, &self.last_error) {
            (Some(items), _) if !items.is_empty() => ListDisplay::Items(items),
            (Some(_), _) => ListDisplay::NoData,
            (None, Some(e)) => ListDisplay::Error(e),
            (None, None) if self.loading => ListDisplay::Loading,
            (None, None) => ListDisplay::NotLoaded,
        }
    }
}

/// A list fetched wholesale from the service.
///
/// `load` and `refresh` calls made while a fetch is outstanding join that fetch
/// instead of starting another one. The fetch runs as its own task and is
/// applied to the cache whether or not anyone is still waiting on it.
pub struct ListCache<T: Clone + Send + Sync + 'static> {
    label: &'static str,
    fetch: Arc<FetchFn<T>>,
    state: Arc<RwLock<ListView<T>>>,
    in_flight: Arc<Mutex<Option<InFlight<T>>>>,
    closed: Arc<AtomicBool>,
}

pub type SessionRegistry = ListCache<SessionId>;
pub type FileCatalog = ListCache<FileEntry>;

impl<T: Clone + Send + Sync + 'static> Clone for ListCache<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            fetch: self.fetch.clone(),
            state: self.state.clone(),
            in_flight: self.in_flight.clone(),
            closed: self.closed.clone(),
        }
    }
}

impl ListCache<SessionId> {
    pub fn sessions(service: Arc<dyn PrinterService>, closed: Arc<AtomicBool>) -> Self {
        Self::new("sessions", closed, move || {
            let service = service.clone();
            async move { service.list_sessions().await }.boxed()
        })
    }
}

impl ListCache<FileEntry> {
    pub fn files(service: Arc<dyn PrinterService>, closed: Arc<AtomicBool>) -> Self {
        Self::new("files", closed, move || {
            let service = service.clone();
            async move { service.list_files().await }.boxed()
        })
    }
}

impl<T: Clone + Send + Sync + 'static> ListCache<T> {
    pub fn new<F>(label: &'static str, closed: Arc<AtomicBool>, fetch: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<Option<Vec<T>>, ControlError>> + Send + Sync + 'static,
    {
        Self {
            label,
            fetch: Arc::new(fetch),
            state: Arc::new(RwLock::new(ListView::default())),
            in_flight: Arc::new(Mutex::new(None)),
            closed,
        }
    }

    /// Fetch the full list and replace the cache. On failure the previous list
    /// is kept and the error recorded.
    pub async fn load(&self) -> Result<Vec<T>, ControlError> {
        self.join_or_start().await
    }

    pub async fn refresh(&self) -> Result<Vec<T>, ControlError> {
        self.load().await
    }

    pub async fn view(&self) -> ListView<T> {
        self.state.read().await.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    fn join_or_start(&self) -> InFlight<T> {
        let mut slot = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = slot.as_ref() {
            tracing::debug!("Joining in-flight {} fetch", self.label);
            return existing.clone();
        }
        // Settles even if every caller drops out.
        let label = self.label;
        let fut = tokio::spawn(self.run_fetch())
            .map(move |joined| {
                joined.unwrap_or_else(|e| Err(ControlError::Transport(format!("{} fetch task failed: {}", label, e))))
            })
            .boxed()
            .shared();
        *slot = Some(fut.clone());
        fut
    }

    fn run_fetch(&self) -> impl std::future::Future<Output = Result<Vec<T>, ControlError>> + Send + 'static {
        let label = self.label;
        let fetch = (self.fetch)();
        let state = self.state.clone();
        let in_flight = self.in_flight.clone();
        let closed = self.closed.clone();
        async move {
            tracing::debug!("Fetching {} list", label);
            if !closed.load(Ordering::Acquire) {
                state.write().await.loading = true;
            }
            let result = fetch.await.map(Option::unwrap_or_default);
            if !closed.load(Ordering::Acquire) {
                let mut view = state.write().await;
                view.loading = false;
                match &result {
                    Ok(items) => {
                        view.items = Some(items.clone());
                        view.last_error = None;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {} list: {}", label, e);
                        view.last_error = Some(e.to_string());
                    }
                }
            }
            in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            result
        }
    }
}
