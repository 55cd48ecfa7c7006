//! Fixed-interval backoff.

use std::time::Duration;

use tokio::time::sleep;

/// Waits the same interval before every retry, with no cap on attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Delay before retry number `attempt` (1-based). The first send is immediate.
    pub fn delay_for(&self, attempt: u64) -> Duration {
        if attempt == 0 {
            Duration::ZERO
        } else {
            self.delay
        }
    }

    /// Suspend the calling task for the retry interval.
    pub async fn wait(&self) {
        sleep(self.delay).await;
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
