//! Sequential, lexically ordered directory walker

use crate::logging::{Action, SyncLog};
use crate::scanner::IgnoreSet;
use crate::types::PathEntry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An entry (or the root) that could not be read during a walk
#[derive(Debug)]
pub struct WalkFailure {
    /// Absolute path of the failing entry
    pub path: PathBuf,
    /// Depth below the walk root (0 = the root itself)
    pub depth: usize,
    pub error: io::Error,
}

impl WalkFailure {
    pub(crate) fn from_walkdir(err: walkdir::Error, root: &Path) -> Self {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        let depth = err.depth();
        Self {
            path,
            depth,
            error: io::Error::from(err),
        }
    }

    /// Did the walk root itself fail?
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// Decision taken after a failed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFlow {
    Continue,
    Abort,
}

/// Decides, per failed entry, whether a walk keeps going
pub trait ErrorPolicy {
    fn on_failure(&self, failure: &WalkFailure) -> WalkFlow;
}

/// Skip entries that fail; abort only when the root cannot be read
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipFailedEntries;

impl ErrorPolicy for SkipFailedEntries {
    fn on_failure(&self, failure: &WalkFailure) -> WalkFlow {
        if failure.is_root() {
            WalkFlow::Abort
        } else {
            WalkFlow::Continue
        }
    }
}

/// Depth-first walk of a tree in lexical order, parents before children.
///
/// The root is never yielded. Paths matching the ignore set are dropped;
/// an ignored directory prunes its whole subtree. Each item is either a
/// [`PathEntry`] with metadata captured now, or a [`WalkFailure`] for the
/// caller's [`ErrorPolicy`] to judge.
pub struct Walker<'a> {
    root: PathBuf,
    inner: walkdir::IntoIter,
    ignore: &'a IgnoreSet,
    excluded: Option<PathBuf>,
    log: &'a SyncLog,
}

impl<'a> Walker<'a> {
    pub fn new(root: &Path, ignore: &'a IgnoreSet, log: &'a SyncLog) -> Self {
        let inner = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            root: root.to_path_buf(),
            inner,
            ignore,
            excluded: None,
            log,
        }
    }

    /// Also prune the subtree at `relative` (e.g. a destination nested in
    /// the source)
    pub fn excluding(mut self, relative: PathBuf) -> Self {
        self.excluded = Some(relative);
        self
    }

    /// Why `relative` is dropped from the walk, if it is
    fn skip_reason(&self, relative: &Path, is_dir: bool) -> Option<&'static str> {
        if self
            .excluded
            .as_deref()
            .is_some_and(|excluded| relative.starts_with(excluded))
        {
            return Some("Path is the destination directory, skipping");
        }
        if self.ignore.matches(relative, is_dir) {
            return Some("Path matched .gosyncignore rule, skipping");
        }
        None
    }
}

impl Iterator for Walker<'_> {
    type Item = Result<PathEntry, WalkFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(WalkFailure::from_walkdir(err, &self.root))),
            };

            if entry.depth() == 0 {
                continue;
            }

            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(p) => p.to_path_buf(),
                Err(_) => continue,
            };
            let is_dir = entry.file_type().is_dir();

            if let Some(reason) = self.skip_reason(&relative, is_dir) {
                self.log.debug(Action::Ignore, &relative, reason);
                if is_dir {
                    self.inner.skip_current_dir();
                }
                continue;
            }

            // Follows symlinks: a link to a file is synced as that file
            let captured =
                fs::metadata(entry.path()).and_then(|m| PathEntry::from_metadata(relative, &m));

            return Some(match captured {
                Ok(path_entry) => Ok(path_entry),
                Err(error) => {
                    if is_dir {
                        self.inner.skip_current_dir();
                    }
                    Err(WalkFailure {
                        path: entry.path().to_path_buf(),
                        depth: entry.depth(),
                        error,
                    })
                }
            });
        }
    }
}
