//! Single-writer cell holding the selected session.

use tokio::sync::watch;

use crate::model::SessionId;

/// The only writer of the selection. Owned by the session controller.
#[derive(Debug)]
pub struct Selection {
    tx: watch::Sender<Option<SessionId>>,
}

impl Selection {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replace the selection. Readers see the new value immediately.
    pub fn set(&self, id: SessionId) {
        self.tx.send_replace(Some(id));
    }

    pub fn current(&self) -> Option<SessionId> {
        self.tx.borrow().clone()
    }

    pub fn handle(&self) -> SelectionHandle {
        SelectionHandle { rx: self.tx.subscribe() }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the selection, handed to the dispatcher and display layer.
#[derive(Debug, Clone)]
pub struct SelectionHandle {
    rx: watch::Receiver<Option<SessionId>>,
}

impl SelectionHandle {
    pub fn current(&self) -> Option<SessionId> {
        self.rx.borrow().clone()
    }

    /// Wait for the next selection, including re-selecting the same session.
    /// Returns `None` once the owning controller is gone.
    pub async fn changed(&mut self) -> Option<SessionId> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}
