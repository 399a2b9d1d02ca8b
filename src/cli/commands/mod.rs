//! CLI command implementations

pub mod diagnose;
pub mod ingest;
pub mod init;
pub mod merge;
pub mod run;
pub mod validate;
