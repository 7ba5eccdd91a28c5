//! Shared HTTP plumbing for the outbound API clients

use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// User agent sent with every request; some market-data hosts reject blank ones
pub const USER_AGENT: &str = concat!("smacross/", env!("CARGO_PKG_VERSION"));

/// Build a client with the given request timeout
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Spaces consecutive requests at least `min_interval` apart
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    /// Wait until the next request may be sent, then claim the slot
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.min_interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}
