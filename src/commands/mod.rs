//! Command entry points

pub mod sync;

pub use sync::{run, run_with_progress};
