//! Removal of destination entries that have no source counterpart

use crate::logging::{Action, SyncLog};
use crate::scanner::{ErrorPolicy, WalkFailure, WalkFlow};
use crate::types::{DeletionStats, SeenSet, SyncError};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use walkdir::WalkDir;

/// Walk `dest_root` and remove every entry whose relative path is missing
/// from `seen`.
///
/// Must only be called after every copy job has finished. A directory that
/// is removed takes its subtree with it, so its children are never visited.
/// The root itself is never a candidate.
pub fn propagate_deletions(
    dest_root: &Path,
    seen: &SeenSet,
    dry_run: bool,
    log: &SyncLog,
    policy: &dyn ErrorPolicy,
) -> Result<DeletionStats, SyncError> {
    log.milestone("START: Propagating deletions in destination");

    let mut stats = DeletionStats::default();
    let mut walker = WalkDir::new(dest_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(item) = walker.next() {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let failure = WalkFailure::from_walkdir(err, dest_root);
                if failure.is_root() && failure.error.kind() == ErrorKind::NotFound {
                    // Nothing was ever synced here
                    return Ok(stats);
                }
                log.error(&failure.path, &failure.error, "Error walking destination directory");
                match policy.on_failure(&failure) {
                    WalkFlow::Continue => continue,
                    WalkFlow::Abort => {
                        return Err(SyncError::Traversal {
                            path: failure.path,
                            source: failure.error,
                        })
                    }
                }
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let relative = match entry.path().strip_prefix(dest_root) {
            Ok(p) => p,
            Err(_) => continue,
        };
        if seen.contains(relative) {
            continue;
        }

        let is_dir = entry.file_type().is_dir();

        if dry_run {
            log.info(Action::Delete, relative, "DRY_RUN: Would delete file");
            stats.would_delete += 1;
        } else {
            match remove_entry(entry.path(), is_dir) {
                Ok(()) => {
                    log.info(Action::Delete, relative, "Successfully deleted file");
                    stats.deleted += 1;
                }
                Err(source) => {
                    let err = SyncError::Delete {
                        path: entry.path().to_path_buf(),
                        source,
                    };
                    log.error(entry.path(), &err, "Error deleting file");
                    stats.failed += 1;
                }
            }
        }

        if is_dir {
            walker.skip_current_dir();
        }
    }

    Ok(stats)
}

/// Already gone counts as removed
fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    let result = if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
