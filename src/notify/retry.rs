//! Bounded retry for alert delivery.
//!
//! The delay between attempts follows:
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```
//! Retries stay inside the current tick. Once they are exhausted the error
//! goes back to the scheduler, which leaves the target's state untouched so
//! the next tick offers the same article again.

use super::{Alert, Notifier};
use crate::error::NotifyError;
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Wraps a [`Notifier`] with exponential backoff and jitter.
pub struct RetryNotifier<T> {
    inner: T,
    /// Extra attempts after the first one.
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryNotifier<T>
where
    T: Notifier,
{
    /// # Example
    ///
    /// ```ignore
    /// let channel = AlertChannel::from_config(&config.notifier, timeout)?;
    /// let notifier = RetryNotifier::new(channel, 2, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryNotifier")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Notifier for RetryNotifier<T>
where
    T: Notifier,
{
    #[instrument(level = "debug", skip_all, fields(link = %alert.link))]
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.send(alert).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis(),
                            error = %e,
                            "Alert delivery exhausted retries"
                        );
                        return Err(e);
                    }

                    let shift = u32::try_from(attempt - 1).unwrap_or(u32::MAX).min(16);
                    let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis(),
                        ?delay,
                        error = %e,
                        "Alert delivery failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
