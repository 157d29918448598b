//! Deduplicates identical log messages within a rolling window (component
//! C7), the way the original suppresses repeated prints: a message seen
//! less than `interval` ago is dropped, and the whole table is cleared in
//! bulk once it grows past a cap rather than evicted entry by entry. The
//! interval is `Config::print_interval` (C11), not a hardcoded constant, so
//! a caller tuning that config tunes this too.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::clock::Clock;

const MAX_TRACKED_MESSAGES: usize = 100;

pub struct RateLimiter<C: Clock> {
    clock: C,
    interval: Duration,
    last_emitted: HashMap<String, Instant>,
}

impl<C: Clock> RateLimiter<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        RateLimiter { clock, interval, last_emitted: HashMap::new() }
    }

    /// Returns `true` if `message` should be emitted now (and records that
    /// it was), `false` if it was emitted too recently and should be
    /// suppressed.
    pub fn should_emit(&mut self, message: &str) -> bool {
        if self.last_emitted.len() >= MAX_TRACKED_MESSAGES {
            self.last_emitted.clear();
        }

        let now = self.clock.now();
        if let Some(&last) = self.last_emitted.get(message) {
            if now.duration_since(last) < self.interval {
                return false;
            }
        }

        self.last_emitted.insert(message.to_string(), now);
        true
    }
}
