//! Fixed minimum spacing between calls to an external service.

use std::time::{Duration, Instant};

/// Enforces at least `interval` between consecutive [`RateLimiter::wait`] returns.
///
/// The first call never sleeps. Time spent on the request itself counts
/// toward the interval, so a slow response is not followed by a full delay.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the next call is allowed.
    pub fn remaining(&self) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Block until the next call is allowed, then mark it as made.
    pub fn wait(&mut self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.last = Some(Instant::now());
    }
}
