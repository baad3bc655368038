use std::time::Instant;

/// Logs the elapsed time of a scope when dropped.
#[derive(Debug)]
pub struct TimerGuard {
    name: &'static str,
    start: Instant,
}

impl TimerGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        tracing::debug!(name = self.name, elapsed_us = elapsed.as_micros() as u64, "timed");
    }
}
