//! Ignore patterns loaded from the source root

use crate::logging::{Action, SyncLog};
use crate::types::SyncError;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Name of the optional ignore file at the source root
pub const IGNORE_FILE_NAME: &str = ".gosyncignore";

/// Compiled exclusion patterns.
///
/// Built once per run and never mutated afterwards, so workers and the
/// walker share it without locking.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    matcher: Option<Gitignore>,
}

impl IgnoreSet {
    /// A set that matches nothing
    pub fn empty() -> Self {
        Self { matcher: None }
    }

    /// Load `.gosyncignore` from the source root.
    ///
    /// A missing file gives an empty set. A file that cannot be read or that
    /// contains an invalid pattern is logged and also gives an empty set:
    /// a broken ignore file never blocks synchronization.
    pub fn load(source_root: &Path, log: &SyncLog) -> Self {
        let ignore_file = source_root.join(IGNORE_FILE_NAME);
        if !ignore_file.is_file() {
            return Self::empty();
        }

        let mut builder = GitignoreBuilder::new(source_root);
        if let Some(err) = builder.add(&ignore_file) {
            log.error(&ignore_file, &err, "Error reading .gosyncignore file");
            return Self::empty();
        }

        match builder.build() {
            Ok(matcher) => {
                let set = Self::from_matcher(matcher);
                if !set.is_empty() {
                    log.debug(
                        Action::Ignore,
                        &ignore_file,
                        &format!("Loaded {} ignore patterns", set.len()),
                    );
                }
                set
            }
            Err(err) => {
                log.error(&ignore_file, &err, "Error reading .gosyncignore file");
                Self::empty()
            }
        }
    }

    /// Build a set from in-memory pattern lines
    pub fn from_patterns<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Self, SyncError> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder.add_line(None, pattern.as_ref()).map_err(|e| {
                SyncError::Config(format!(
                    "Invalid ignore pattern '{}': {}",
                    pattern.as_ref(),
                    e
                ))
            })?;
        }

        let matcher = builder
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build ignore patterns: {}", e)))?;
        Ok(Self::from_matcher(matcher))
    }

    fn from_matcher(matcher: Gitignore) -> Self {
        if matcher.is_empty() {
            Self::empty()
        } else {
            Self {
                matcher: Some(matcher),
            }
        }
    }

    /// Check whether a root-relative path is excluded.
    ///
    /// A path is also excluded when one of its parent directories is.
    pub fn matches(&self, relative_path: &Path, is_dir: bool) -> bool {
        match &self.matcher {
            Some(matcher) if !relative_path.as_os_str().is_empty() => matcher
                .matched_path_or_any_parents(relative_path, is_dir)
                .is_ignore(),
            _ => false,
        }
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.matcher
            .as_ref()
            .map_or(0, |m| (m.num_ignores() + m.num_whitelists()) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_none()
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::empty()
    }
}
