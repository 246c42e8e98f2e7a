//! Core type definitions for treesync

mod entry;
mod error;
mod report;
mod seen;

pub use entry::{EntryKind, PathEntry};
pub use error::{CopyStage, SyncError};
pub use report::{DeletionStats, FileOutcome, SyncReport};
pub use seen::SeenSet;
