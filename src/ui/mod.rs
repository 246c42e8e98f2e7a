//! Terminal output: progress spinner and the final summary line

mod progress;

pub use progress::ProgressReporter;

use crate::types::SyncReport;
use indicatif::{HumanBytes, HumanDuration};

/// One-line summary printed after a successful run
pub fn format_summary(report: &SyncReport) -> String {
    let mut line = format!(
        "Synchronization completed in {}: {} files checked, {} copied ({}), {} up to date",
        HumanDuration(report.elapsed),
        report.files_seen,
        report.copied,
        HumanBytes(report.bytes_copied),
        report.up_to_date
    );

    if report.would_copy > 0 {
        line.push_str(&format!(", {} would be copied", report.would_copy));
    }
    if let Some(deletions) = &report.deletions {
        if deletions.would_delete > 0 {
            line.push_str(&format!(", {} would be deleted", deletions.would_delete));
        } else {
            line.push_str(&format!(", {} deleted", deletions.deleted));
        }
    }

    if report.walk_errors > 0 {
        line.push_str(&format!(", {} skipped", report.walk_errors));
    }

    let failed = report.failed + report.deletions.as_ref().map_or(0, |d| d.failed);
    if failed > 0 {
        line.push_str(&format!(", {} failed", failed));
    }
    line
}
