//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for shutdown requests.
///
/// Broadcasts the name of the signal that asked for shutdown to every
/// subscribed task.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<&'static str>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to shutdown requests.
    pub fn subscribe(&self) -> broadcast::Receiver<&'static str> {
        self.tx.subscribe()
    }

    /// Request shutdown, naming the cause.
    pub fn trigger(&self, cause: &'static str) {
        let _ = self.tx.send(cause);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
