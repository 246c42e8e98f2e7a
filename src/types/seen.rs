//! SeenSet - Relative paths observed during the source walk

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of relative paths yielded by the source walk.
///
/// Written only by the orchestrator thread while walking, then read by the
/// deletion pass after every copy job has drained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    paths: HashSet<PathBuf>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a relative path. Returns false if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<PathBuf> for SeenSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
