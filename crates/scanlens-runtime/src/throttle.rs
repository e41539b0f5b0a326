use std::time::{Duration, Instant};

/// Trailing-edge coalescer: the first value opens a window, later values in
/// the same window replace it, and [`Coalescer::poll`] releases only the
/// latest one once the window has elapsed.
#[derive(Debug)]
pub struct Coalescer<T> {
    window: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Coalescer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        let deadline = match &self.pending {
            Some((deadline, _)) => *deadline,
            None => now + self.window,
        };
        self.pending = Some((deadline, value));
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Leading-edge limiter: lets one call through, then drops calls until the
/// window has elapsed.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        let allowed = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.window,
        };
        if allowed {
            self.last = Some(now);
        }
        allowed
    }
}
