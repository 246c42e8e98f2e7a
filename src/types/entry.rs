//! PathEntry - A single file or directory discovered during a walk

use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

/// Whether an entry is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Represents one entry of a synced tree, with metadata captured at discovery
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry {
    /// Relative path from the tree root
    pub path: PathBuf,

    pub kind: EntryKind,

    /// File size in bytes
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,

    /// Unix permissions (mode bits)
    pub permissions: u32,
}

impl PathEntry {
    /// Create a new file entry
    pub fn file(path: PathBuf, size: u64, mtime: SystemTime, permissions: u32) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            size,
            mtime,
            permissions,
        }
    }

    /// Create a new directory entry
    pub fn directory(path: PathBuf, mtime: SystemTime, permissions: u32) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            size: 0,
            mtime,
            permissions,
        }
    }

    /// Build an entry from filesystem metadata.
    ///
    /// Fails only when the platform cannot report a modification time.
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> std::io::Result<Self> {
        let mtime = metadata.modified()?;
        let permissions = permission_bits(metadata);

        if metadata.is_dir() {
            Ok(Self::directory(path, mtime, permissions))
        } else {
            Ok(Self::file(path, metadata.len(), mtime, permissions))
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    // Only the read-only flag exists here
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
