use std::time::{Duration, Instant};

/// Holds the latest value until it has been left alone for `delay`.
#[derive(Debug)]
pub struct Debounced<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounced<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, since)) if now.saturating_duration_since(*since) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Take the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn waits_for_quiet_period() {
        let start = Instant::now();
        let mut debounced = Debounced::new(DELAY);
        debounced.push("a", start);
        assert_eq!(debounced.poll(start + Duration::from_millis(100)), None);
        assert_eq!(debounced.poll(start + DELAY), Some("a"));
        assert!(!debounced.is_pending());
        assert_eq!(debounced.poll(start + DELAY * 2), None);
    }

    #[test]
    fn later_push_restarts_and_replaces() {
        let start = Instant::now();
        let mut debounced = Debounced::new(DELAY);
        debounced.push("a", start);
        debounced.push("ab", start + Duration::from_millis(200));
        assert_eq!(debounced.poll(start + DELAY), None);
        assert_eq!(
            debounced.poll(start + Duration::from_millis(500)),
            Some("ab")
        );
    }

    #[test]
    fn flush_skips_the_wait() {
        let mut debounced = Debounced::new(DELAY);
        debounced.push(String::from("zelda"), Instant::now());
        assert_eq!(debounced.flush().as_deref(), Some("zelda"));
        assert_eq!(debounced.flush(), None);
    }
}
