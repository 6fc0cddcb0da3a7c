use std::time::{Duration, Instant};

use tracing::info;

/// Default wall-clock interval between progress messages
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(30);

/// Emits a progress message at most once per interval.
///
/// Owned by a single worker; nothing is shared between partitions.
#[derive(Debug)]
pub struct ProgressReporter {
    interval: Duration,
    last_report: Instant,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_report: Instant::now(),
        }
    }

    /// Report `done` of `total` rows if the interval has elapsed since the last report.
    ///
    /// Returns whether a message was emitted.
    pub fn tick(&mut self, done: usize, total: usize) -> bool {
        if self.last_report.elapsed() < self.interval {
            return false;
        }

        #[allow(clippy::cast_precision_loss)] // Percentage for display only
        let percent = if total == 0 {
            100.0
        } else {
            done as f64 / total as f64 * 100.0
        };
        info!("Processing: {done}/{total} variants ({percent:.1}%)");

        self.last_report = Instant::now();
        true
    }
}
