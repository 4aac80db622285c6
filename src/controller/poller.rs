//! Periodic printer status polling.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::PrinterService;
use crate::model::PrinterStatus;

/// What the display layer sees of the printer status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub latest_status: Option<PrinterStatus>,
    /// The last completed fetch failed; `latest_status` predates it.
    pub is_stale: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl StatusView {
    fn apply(&mut self, result: Result<PrinterStatus, crate::error::ControlError>) {
        match result {
            Ok(status) => {
                self.latest_status = Some(status);
                self.is_stale = false;
                self.last_error = None;
                self.last_updated = Some(Utc::now());
            }
            Err(e) => {
                self.is_stale = true;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

/// Background task keeping a near-real-time [`StatusView`].
///
/// At most one status request is outstanding at any time: the loop awaits each
/// fetch before waiting for the next tick, and ticks missed meanwhile are skipped.
pub struct StatusPoller {
    state: Arc<RwLock<StatusView>>,
    wake: Arc<Notify>,
    shutdown_tx: broadcast::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Start polling. The first fetch is issued immediately.
    pub fn start(service: Arc<dyn PrinterService>, period: Duration) -> Self {
        let state = Arc::new(RwLock::new(StatusView::default()));
        let wake = Arc::new(Notify::new());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(poll_loop(service, period, state.clone(), wake.clone(), shutdown_rx));
        tracing::info!("Status poller started ({} ms interval)", period.as_millis());
        Self {
            state,
            wake,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    pub async fn view(&self) -> StatusView {
        self.state.read().await.clone()
    }

    /// Ask for a fetch now instead of at the next tick. Coalesces with a fetch
    /// already in flight.
    pub fn poll_now(&self) {
        self.wake.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop scheduling ticks and discard any in-flight result.
    pub async fn stop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
            tracing::info!("Status poller stopped");
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn poll_loop(
    service: Arc<dyn PrinterService>,
    period: Duration,
    state: Arc<RwLock<StatusView>>,
    wake: Arc<Notify>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = interval.tick() => {}
            _ = wake.notified() => {
                interval.reset();
            }
        }
        tracing::debug!("Polling printer status");
        let result = tokio::select! {
            _ = shutdown_rx.recv() => break,
            result = service.printer_info() => result,
        };
        if let Err(e) = &result {
            tracing::warn!("Status poll failed, keeping last snapshot: {}", e);
        }
        state.write().await.apply(result);
    }
    tracing::debug!("Status poll loop shutting down");
}
