//! Progress reporting

use crate::types::{FileOutcome, SyncReport};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner fed by the workers' progress callback
pub struct ProgressReporter {
    bar: ProgressBar,
    tally: Mutex<SyncReport>,
}

impl ProgressReporter {
    /// Create a new progress reporter drawing to stderr
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    /// Reporter that keeps counting but never draws
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message("Scanning source...");

        Self {
            bar,
            tally: Mutex::new(SyncReport::default()),
        }
    }

    /// Count one finished file and refresh the message
    pub fn record(&self, outcome: &FileOutcome) {
        let Ok(mut tally) = self.tally.lock() else {
            return;
        };
        tally.record(*outcome);
        self.bar.set_message(format!(
            "{} checked | {} copied ({}) | {} failed",
            tally.copied + tally.up_to_date + tally.would_copy + tally.failed,
            tally.copied,
            HumanBytes(tally.bytes_copied),
            tally.failed
        ));
    }

    /// Files processed so far
    pub fn processed(&self) -> usize {
        self.tally
            .lock()
            .map(|t| t.copied + t.up_to_date + t.would_copy + t.failed)
            .unwrap_or(0)
    }

    /// Remove the spinner before the summary line is printed
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
