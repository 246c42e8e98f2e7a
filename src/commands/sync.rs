//! Main sync command

use crate::executor::{
    propagate_deletions, CopyJob, FileProcessor, ProgressCallback, WorkerPool,
};
use crate::logging::{Action, SyncLog};
use crate::scanner::{ErrorPolicy, IgnoreSet, SkipFailedEntries, WalkFlow, Walker};
use crate::types::{SeenSet, SyncError, SyncReport};
use crate::Config;
use std::sync::Arc;
use std::time::Instant;

/// Run one synchronization pass
pub fn run(config: &Config, log: &SyncLog) -> Result<SyncReport, SyncError> {
    run_with_progress(config, log, None)
}

/// Run one synchronization pass, reporting every finished file to
/// `on_progress`.
///
/// Phases, strictly in this order:
/// 1. validate the configuration
/// 2. load `.gosyncignore` and start the worker pool
/// 3. walk the source, recording every yielded path and enqueueing files
/// 4. close the queue and wait for every worker
/// 5. propagate deletions, when enabled and the walk completed
pub fn run_with_progress(
    config: &Config,
    log: &SyncLog,
    on_progress: Option<Arc<ProgressCallback>>,
) -> Result<SyncReport, SyncError> {
    let started = Instant::now();
    config.validate()?;

    log.milestone(&format!(
        "START: Synchronizing {} -> {}",
        config.source.display(),
        config.destination.display()
    ));
    if config.dry_run {
        log.milestone("DRY_RUN: No changes will be made");
    }

    let ignore = IgnoreSet::load(&config.source, log);

    let processor = FileProcessor::new(
        config.source.clone(),
        config.destination.clone(),
        config.dry_run,
        log.clone(),
    )
    .with_progress(on_progress);
    let pool = WorkerPool::new(config.worker_count(), Arc::new(processor))?;

    // Walk counters; copy counters come from the pool once it drains
    let mut walked = SyncReport::default();
    let mut seen = SeenSet::new();
    let policy = SkipFailedEntries;

    let mut walker = Walker::new(&config.source, &ignore, log);
    if let Some(nested) = config.destination_within_source() {
        walker = walker.excluding(nested);
    }

    let mut aborted = None;
    for item in walker {
        match item {
            Ok(entry) => {
                seen.insert(entry.path.clone());
                if entry.is_dir() {
                    log.debug(Action::CheckDir, &entry.path, "Directory check started");
                    walked.dirs_seen += 1;
                } else {
                    walked.files_seen += 1;
                    if let Err(e) = pool.enqueue(CopyJob { entry }) {
                        aborted = Some(e);
                        break;
                    }
                }
            }
            Err(failure) => {
                log.error(&failure.path, &failure.error, "Error walking source directory");
                walked.walk_errors += 1;
                if policy.on_failure(&failure) == WalkFlow::Abort {
                    aborted = Some(SyncError::Traversal {
                        path: failure.path,
                        source: failure.error,
                    });
                    break;
                }
            }
        }
    }

    // Drain barrier: nothing below may run while a copy is in flight
    let stats = pool.close_and_wait()?;
    if let Some(err) = aborted {
        return Err(err);
    }

    let mut report = SyncReport {
        files_seen: walked.files_seen,
        dirs_seen: walked.dirs_seen,
        walk_errors: walked.walk_errors,
        ..stats.outcomes
    };

    if config.delete {
        log.milestone(&format!("Source walk recorded {} paths", seen.len()));
        report.deletions = Some(propagate_deletions(
            &config.destination,
            &seen,
            config.dry_run,
            log,
            &policy,
        )?);
    }

    report.elapsed = started.elapsed();
    log.milestone("END: Synchronization finished");
    Ok(report)
}
