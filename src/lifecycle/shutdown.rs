//! Shutdown coordination for a probe run.
//!
//! A run stops in two stages. The first trigger stops new iterations and lets
//! in-flight ones drain. Forcing aborts whatever is still running.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Running,
    Draining,
    Forced,
}

/// Coordinator for stopping a run early.
///
/// Backed by a watch channel, so listeners created after the trigger still
/// observe it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<Stage>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Stage::Running);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Stop starting iterations. Idempotent.
    pub fn trigger(&self) {
        self.advance(Stage::Draining);
    }

    /// Abort in-flight iterations without waiting out the graceful stop.
    /// Implies [`Shutdown::trigger`].
    pub fn force(&self) {
        self.advance(Stage::Forced);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow() >= Stage::Draining
    }

    pub fn is_forced(&self) -> bool {
        *self.tx.borrow() == Stage::Forced
    }

    // The stage only moves forward.
    fn advance(&self, to: Stage) {
        self.tx.send_if_modified(|stage| {
            if *stage < to {
                *stage = to;
                true
            } else {
                false
            }
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<Stage>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow() >= Stage::Draining
    }

    pub fn is_forced(&self) -> bool {
        *self.rx.borrow() == Stage::Forced
    }

    /// Resolve once shutdown has been triggered.
    ///
    /// Never resolves if the coordinator is dropped without triggering.
    pub async fn wait(&mut self) {
        self.wait_until(Stage::Draining).await;
    }

    /// Resolve once the stop has been forced.
    pub async fn wait_forced(&mut self) {
        self.wait_until(Stage::Forced).await;
    }

    async fn wait_until(&mut self, stage: Stage) {
        if self.rx.wait_for(|current| *current >= stage).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_listener() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        assert!(!listener.is_triggered());

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), listener.wait())
            .await
            .expect("listener should wake");
        assert!(shutdown.is_triggered());
        assert!(!shutdown.is_forced());
    }

    #[tokio::test]
    async fn test_late_listener_sees_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let mut listener = shutdown.subscribe();
        assert!(listener.is_triggered());
        tokio::time::timeout(Duration::from_millis(100), listener.wait())
            .await
            .expect("already triggered");
    }

    #[tokio::test]
    async fn test_dropped_coordinator_does_not_stop() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        drop(shutdown);

        let waited = tokio::time::timeout(Duration::from_millis(50), listener.wait()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_trigger_alone_does_not_force() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        shutdown.trigger();

        let waited = tokio::time::timeout(Duration::from_millis(50), listener.wait_forced()).await;
        assert!(waited.is_err());
        assert!(listener.is_triggered());
        assert!(!listener.is_forced());
    }

    #[tokio::test]
    async fn test_force_after_trigger_wakes_listener() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        shutdown.trigger();
        listener.wait().await;

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.force();
        });

        tokio::time::timeout(Duration::from_secs(1), listener.wait_forced())
            .await
            .expect("forced stop should wake");
        assert!(listener.is_forced());
    }

    #[test]
    fn test_stage_never_moves_back() {
        let shutdown = Shutdown::new();
        shutdown.force();
        shutdown.trigger();

        assert!(shutdown.is_triggered());
        assert!(shutdown.is_forced());
    }
}
