//! Pause policy applied between metadata requests.
//!
//! The pipeline calls [`Throttle::pause`] once after every metadata request,
//! whether the request succeeded or not. [`FixedDelay`] sleeps a constant
//! duration; [`FixedDelay::disabled`] returns immediately so tests run without
//! real delays.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use homebrew_catalog::throttle::{FixedDelay, Throttle};
//!
//! # async fn example() {
//! let throttle = FixedDelay::new(Duration::from_millis(500));
//! throttle.pause().await;
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, trace};

/// A pause policy between sequential requests.
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Waits according to the policy.
    async fn pause(&self);
}

/// Sleeps a fixed duration on every pause.
#[derive(Debug)]
pub struct FixedDelay {
    delay: Duration,

    /// Total time slept so far, in milliseconds.
    slept_ms: AtomicU64,
}

impl FixedDelay {
    /// Creates a throttle that sleeps `delay` on every pause.
    #[must_use]
    #[instrument(skip_all, fields(delay_ms = delay.as_millis()))]
    pub fn new(delay: Duration) -> Self {
        debug!("creating fixed-delay throttle");
        Self {
            delay,
            slept_ms: AtomicU64::new(0),
        }
    }

    /// Creates a throttle that never sleeps.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns whether pauses are no-ops.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.delay.is_zero()
    }

    /// Returns the configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the cumulative time spent sleeping.
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        Duration::from_millis(self.slept_ms.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn pause(&self) {
        if self.is_disabled() {
            return;
        }
        trace!(delay_ms = self.delay.as_millis(), "throttling");
        tokio::time::sleep(self.delay).await;
        let delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX);
        self.slept_ms.fetch_add(delay_ms, Ordering::SeqCst);
    }
}
