use std::time::Duration;

use tokio::time::Instant;

/// Monotonic start point for the intro's elapsed readout.
#[derive(Debug, Clone, Copy)]
pub struct ElapsedClock {
    started: Instant,
}

impl ElapsedClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn readout(&self) -> String {
        format_elapsed(self.elapsed())
    }
}

/// Formats as `mm:ss:cc`; minutes wrap at one hour.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let centis = (millis % 1000) / 10;
    let seconds = (millis / 1000) % 60;
    let minutes = (millis / 60_000) % 60;
    format!("{minutes:02}:{seconds:02}:{centis:02}")
}

#[cfg(test)]
#[path = "tests/clock_tests.rs"]
mod tests;
