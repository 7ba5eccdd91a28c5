//! Control handle for a running monitor

use super::MonitorError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Stops a spawned monitor and collects its result
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<(), MonitorError>>,
}

impl MonitorHandle {
    pub(super) fn new(
        shutdown: watch::Sender<bool>,
        task: JoinHandle<Result<(), MonitorError>>,
    ) -> Self {
        Self { shutdown, task }
    }

    /// Whether the monitor loop is still running
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Wait for the loop to end on its own (only happens on a fatal error).
    ///
    /// Do not call [`stop`](Self::stop) after this has returned.
    pub async fn finished(&mut self) -> Result<(), MonitorError> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(MonitorError::Fatal(format!("monitor task failed: {}", e))),
        }
    }

    /// Ask the loop to stop after any in-flight tick, then wait for it
    pub async fn stop(mut self) -> Result<(), MonitorError> {
        let _ = self.shutdown.send(true);
        self.finished().await
    }
}
