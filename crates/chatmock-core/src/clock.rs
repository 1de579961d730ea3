//! Time source used for upload timestamps and stream pacing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Wall clock plus a way to wait.
///
/// Handlers never call `Utc::now()` or `tokio::time::sleep` directly so that
/// tests can freeze time and run paced streams instantly.
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

/// Real time, real delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Real time, but every pause returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelayClock;

#[async_trait]
impl Clock for NoDelayClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}
