//! Directory scanning logic

mod matcher;
mod walker;

pub use matcher::{IgnoreSet, IGNORE_FILE_NAME};
pub use walker::{ErrorPolicy, SkipFailedEntries, WalkFailure, WalkFlow, Walker};
