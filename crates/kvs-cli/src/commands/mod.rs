//! CLI command implementations for kvs-retention.

pub mod config;
pub mod run;
