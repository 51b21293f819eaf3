//! Trailing-edge debouncer.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Runs a callback once the stream of [`touch`](Debouncer::touch) calls has
/// been quiet for the configured window.
pub(crate) struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    /// Spawns the debounce task. Must be called inside a tokio runtime.
    /// The task ends when the debouncer is dropped.
    pub(crate) fn spawn<F, Fut>(window: Duration, mut fire: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                loop {
                    match timeout(window, rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) => return,
                        Err(_elapsed) => break,
                    }
                }
                fire().await;
            }
        });
        Self { tx }
    }

    /// Restarts the quiet window.
    pub(crate) fn touch(&self) {
        let _ = self.tx.send(());
    }
}
