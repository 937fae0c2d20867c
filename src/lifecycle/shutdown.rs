//! Stop coordination for the server.

use tokio::sync::broadcast;

/// Broadcasts a single stop signal to every subscribed server.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the stop signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscriber.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl-C or when `stop` fires (or its sender is dropped).
pub async fn shutdown_signal(mut stop: broadcast::Receiver<()>) {
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                // Without a signal handler, only the broadcast can stop us.
                let _ = stop.recv().await;
            }
        }
        _ = stop.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
