//! Terminal progress reporting

pub mod progress;
