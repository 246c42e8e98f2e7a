//! Executor module for file operations

pub mod copy;
pub mod delete;
pub mod pool;

use crate::diff::{classify, Classification};
use crate::logging::{Action, SyncLog};
use crate::types::FileOutcome;
use std::path::PathBuf;
use std::sync::Arc;

pub use copy::copy_file;
pub use delete::propagate_deletions;
pub use pool::{CopyJob, JobHandler, PoolStats, WorkerPool, QUEUE_DEPTH_PER_WORKER};

/// Optional callback invoked by workers after each finished job
pub type ProgressCallback = dyn Fn(&FileOutcome) + Send + Sync;

/// Classifies one source file against the destination and copies it when
/// needed. Shared by every worker.
pub struct FileProcessor {
    source_root: PathBuf,
    destination_root: PathBuf,
    dry_run: bool,
    log: SyncLog,
    on_progress: Option<Arc<ProgressCallback>>,
}

impl FileProcessor {
    pub fn new(
        source_root: PathBuf,
        destination_root: PathBuf,
        dry_run: bool,
        log: SyncLog,
    ) -> Self {
        Self {
            source_root,
            destination_root,
            dry_run,
            log,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: Option<Arc<ProgressCallback>>) -> Self {
        self.on_progress = on_progress;
        self
    }

    fn process(&self, job: &CopyJob) -> FileOutcome {
        let relative = &job.entry.path;
        let src_path = self.source_root.join(relative);
        let dest_path = self.destination_root.join(relative);

        self.log
            .debug(Action::CheckFile, relative, "File check started");

        match classify(&job.entry, &dest_path) {
            Ok(Classification::UpToDate) => {
                self.log
                    .debug(Action::SkipFile, relative, "File is up-to-date, skipping");
                FileOutcome::UpToDate
            }
            Ok(Classification::CopyNeeded) => {
                self.log
                    .info_to(Action::CopyFile, relative, &dest_path, "Copying file");
                match copy_file(&src_path, &dest_path, &job.entry, self.dry_run, &self.log) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        self.log.error(&dest_path, &err, "Error copying file");
                        FileOutcome::Failed
                    }
                }
            }
            Err(err) => {
                self.log
                    .warn(&dest_path, &err, "Could not stat destination file");
                FileOutcome::Failed
            }
        }
    }
}

impl JobHandler for FileProcessor {
    fn handle(&self, job: CopyJob) -> FileOutcome {
        let outcome = self.process(&job);
        if let Some(callback) = &self.on_progress {
            callback(&outcome);
        }
        outcome
    }
}
