//! # treesync - one-way directory synchronization
//!
//! Mirrors a source tree into a destination tree: new or modified files are
//! copied by a pool of workers, paths matching `.gosyncignore` are skipped,
//! and destination entries missing from the source can optionally be
//! deleted once every copy has finished.

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod logging;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{DeletionStats, FileOutcome, PathEntry, SeenSet, SyncError, SyncReport};
pub use config::Config;
pub use logging::SyncLog;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
