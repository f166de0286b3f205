//! Minimum-interval rate limiting.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);

/// Spaces successive releases at least `min_interval` apart.
///
/// Each caller reserves the next free slot and then sleeps until it, so
/// concurrent waiters are released one interval apart without holding a
/// lock while they sleep.
#[derive(Debug)]
pub struct RateLimiter {
    name:         String,
    min_interval: Duration,
    last_ran:     Mutex<Option<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self { Self::new(DEFAULT_MIN_INTERVAL) }
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self { Self::named("rate_limiter", min_interval) }

    /// `name` prefixes every log line.
    pub fn named(name: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            name: name.into(),
            min_interval,
            last_ran: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn min_interval(&self) -> Duration { self.min_interval }

    /// Claim the next slot and return how long to sleep before it.
    fn reserve(&self) -> Duration {
        let mut last_ran = self.last_ran.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let wait = match *last_ran {
            Some(previous) => {
                let ago = now.saturating_duration_since(previous).as_secs_f64();
                debug!(limiter = %self.name, "{}: Last ran {} seconds ago.", self.name, ago);
                (previous + self.min_interval).saturating_duration_since(now)
            }
            None => Duration::ZERO,
        };

        if !wait.is_zero() {
            debug!(limiter = %self.name, "{}: Waiting {} seconds.", self.name, wait.as_secs_f64());
        }
        *last_ran = Some(now + wait);
        wait
    }

    pub async fn wait(&self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    /// Blocking form of [`wait`](Self::wait). Do not call from async code.
    pub fn wait_blocking(&self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }
}

/// A function that waits on its own [`RateLimiter`] before every call.
#[derive(Debug)]
pub struct RateLimited<F> {
    limiter: RateLimiter,
    f:       F,
}

impl<F> RateLimited<F> {
    pub fn limiter(&self) -> &RateLimiter { &self.limiter }

    pub fn call<A, R>(&self, args: A) -> R
    where
        F: Fn(A) -> R,
    {
        self.limiter.wait_blocking();
        (self.f)(args)
    }
}

/// Wrap `f` so that calls are at least `min_interval` apart.
pub fn rate_limit<F>(name: impl Into<String>, min_interval: Duration, f: F) -> RateLimited<F> {
    RateLimited {
        limiter: RateLimiter::named(name, min_interval),
        f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        assert_eq!(limiter.reserve(), Duration::ZERO);
    }

    #[test]
    fn test_reservations_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        limiter.reserve();
        let second = limiter.reserve();
        let third = limiter.reserve();
        assert!(second > Duration::from_millis(400) && second <= Duration::from_millis(500));
        assert!(third > Duration::from_millis(900) && third <= Duration::from_millis(1000));
    }

    #[test]
    fn test_rate_limit_spaces_calls() {
        let limited = rate_limit("answer", Duration::from_millis(50), |x: u32| x + 1);
        let start = Instant::now();
        assert_eq!(limited.call(41), 42);
        assert_eq!(limited.call(41), 42);
        assert_eq!(limited.call(41), 42);
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(limited.limiter().name(), "answer");
    }

    #[tokio::test]
    async fn test_async_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(30));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(RateLimiter::default().min_interval(), DEFAULT_MIN_INTERVAL);
    }
}
