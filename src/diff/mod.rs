//! Change classification

mod compare;

pub use compare::{classify, needs_copy, Classification};
