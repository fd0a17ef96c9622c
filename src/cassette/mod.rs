//! Cassettes: recorded port interactions used to replay a pipeline run.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
