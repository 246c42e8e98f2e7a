//! Error types for treesync

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of a single file copy that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    CreateDirs,
    OpenSource,
    CreateDestination,
    Stream,
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CopyStage::CreateDirs => "create directories",
            CopyStage::OpenSource => "open source file",
            CopyStage::CreateDestination => "create destination file",
            CopyStage::Stream => "copy file contents",
        };
        f.write_str(label)
    }
}

/// Error types for treesync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A directory tree could not be traversed
    #[error("Cannot traverse {path}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination metadata could not be read
    #[error("Could not stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One stage of a file copy failed
    #[error("Failed to {stage} for {path}: {source}")]
    Copy {
        stage: CopyStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a destination entry failed
    #[error("Failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not accept or finish work
    #[error("Worker pool error: {0}")]
    Pool(String),
}

impl SyncError {
    /// Check if this error comes from configuration checks
    pub fn is_config_error(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }
}
