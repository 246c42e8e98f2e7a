//! Per-file outcomes and the aggregate report of a sync run

use std::time::Duration;

/// What happened to a single copy job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content was written to the destination
    Copied { bytes: u64 },
    /// Destination already matched by size and mtime
    UpToDate,
    /// Dry run: a copy would have happened
    WouldCopy,
    /// Stat or copy failed; logged and abandoned
    Failed,
}

/// Counters from the deletion pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionStats {
    pub deleted: usize,
    pub would_delete: usize,
    pub failed: usize,
}

/// Outcome of a successful synchronization pass.
///
/// Per-file failures are counted here instead of failing the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files yielded by the source walk
    pub files_seen: usize,
    /// Directories yielded by the source walk
    pub dirs_seen: usize,
    /// Source entries skipped by a failed stat during the walk
    pub walk_errors: usize,

    pub copied: usize,
    pub up_to_date: usize,
    pub would_copy: usize,
    pub failed: usize,
    pub bytes_copied: u64,

    /// Present only when deletion propagation ran
    pub deletions: Option<DeletionStats>,

    pub elapsed: Duration,
}

impl SyncReport {
    /// Fold one job outcome into the counters
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Copied { bytes } => {
                self.copied += 1;
                self.bytes_copied += bytes;
            }
            FileOutcome::UpToDate => self.up_to_date += 1,
            FileOutcome::WouldCopy => self.would_copy += 1,
            FileOutcome::Failed => self.failed += 1,
        }
    }

    /// Check whether any entry was skipped by the walk, or any file or
    /// deletion failed
    pub fn has_failures(&self) -> bool {
        self.walk_errors > 0
            || self.failed > 0
            || self.deletions.as_ref().is_some_and(|d| d.failed > 0)
    }
}
