//! Release assembly: artifact building, archiving, notes, and the pipeline
//! that sequences them.

pub mod archive;
pub mod builder;
pub mod notes;
pub mod pipeline;
