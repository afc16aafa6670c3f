use std::fmt;
use std::time::{Duration, Instant};

/// A process-wall-clock stopwatch.
///
/// Reports whole elapsed seconds; partial seconds still ticking if `stop`
/// has not been called yet.
pub struct Timer {
    start: Instant,
    stopped: Option<Duration>,
}

impl Timer {
    /// Creates a timer that is already running.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            stopped: None,
        }
    }

    /// Freezes the elapsed time. Subsequent calls keep the first reading.
    pub fn stop(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(self.start.elapsed());
        }
    }

    /// Whole seconds elapsed between start and stop (or now, if running).
    pub fn elapsed_seconds(&self) -> u64 {
        self.stopped.unwrap_or_else(|| self.start.elapsed()).as_secs()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sec(s)", self.elapsed_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_reports_seconds() {
        let mut timer = Timer::start();
        timer.stop();
        assert_eq!(timer.elapsed_seconds(), 0);
        assert_eq!(timer.to_string(), "0 sec(s)");
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = Timer::start();
        timer.stop();
        let first = timer.elapsed_seconds();
        std::thread::sleep(std::time::Duration::from_millis(5));
        timer.stop();
        assert_eq!(timer.elapsed_seconds(), first);
    }
}
