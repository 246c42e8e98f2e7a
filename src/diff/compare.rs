//! Change detection between a source file and its destination counterpart

use crate::types::{PathEntry, SyncError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Whether a source file has to be copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    CopyNeeded,
    UpToDate,
}

/// Decide whether `src` must be copied over `dest`.
///
/// Metadata-only comparison, no content hashing:
///
/// 1. **Missing destination** → copy
/// 2. **Destination at least as new AND same size** → up to date
/// 3. Anything else → copy
///
/// A same-size edit that lands inside one timestamp tick of the previous
/// copy is not detected.
pub fn needs_copy(src: &PathEntry, dest: Option<&PathEntry>) -> bool {
    match dest {
        None => true,
        Some(dest) => !(dest.mtime >= src.mtime && dest.size == src.size),
    }
}

/// Stat `dest_path` and classify `src` against it.
///
/// `NotFound` counts as a missing destination. Any other stat failure is
/// returned so the caller can abandon this one file.
pub fn classify(src: &PathEntry, dest_path: &Path) -> Result<Classification, SyncError> {
    let stat_error = |source: std::io::Error| SyncError::Stat {
        path: dest_path.to_path_buf(),
        source,
    };

    let dest = match fs::metadata(dest_path) {
        Ok(metadata) => {
            Some(PathEntry::from_metadata(src.path.clone(), &metadata).map_err(stat_error)?)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(stat_error(e)),
    };

    if needs_copy(src, dest.as_ref()) {
        Ok(Classification::CopyNeeded)
    } else {
        Ok(Classification::UpToDate)
    }
}
