//! Throttle: run immediately, then at most once per cooldown window.

use std::time::Duration;

/// Rate limiter that passes the first call through and suppresses calls until
/// the cooldown window opened by that call has elapsed.
///
/// Suppressed calls are dropped, not queued.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use pagekit_core::Throttle;
///
/// let ms = Duration::from_millis;
/// let mut scroll = Throttle::new(ms(16));
/// let fired: Vec<u64> = [0, 5, 10, 20]
///     .into_iter()
///     .filter_map(|t| scroll.call(ms(t), t))
///     .collect();
/// assert_eq!(fired, vec![0, 20]);
/// ```
#[derive(Debug, Clone)]
pub struct Throttle {
    cooldown: Duration,
    window_end: Option<Duration>,
}

impl Throttle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            window_end: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// `true` if a call at `now` would pass.
    pub fn is_ready(&self, now: Duration) -> bool {
        self.window_end.map_or(true, |end| now >= end)
    }

    /// Passes `payload` through if the throttle is ready at `now`, opening a
    /// new window; otherwise drops it and returns `None`.
    pub fn call<T>(&mut self, now: Duration, payload: T) -> Option<T> {
        if !self.is_ready(now) {
            return None;
        }
        self.window_end = Some(now + self.cooldown);
        Some(payload)
    }

    /// Closes the current window so the next call passes immediately.
    pub fn reset(&mut self) {
        self.window_end = None;
    }
}
