//! Convergence runtime for the KVS retention standardizer.
//!
//! - [`client`]: the provider contract (`describe` / conditional `mutate`)
//! - [`engine`]: per-stream decision and single conditional write
//! - [`driver`]: ordered batch processing with an explicit failure policy
//! - [`source`]: identifier list input
//! - [`memory`]: in-memory provider for tests

pub mod client;
pub mod driver;
pub mod engine;
pub mod memory;
pub mod source;

pub use client::{LookupError, MutationError, ResourceClient};
pub use driver::{BatchDriver, BatchSummary, HaltReason};
pub use engine::{ConvergenceEngine, Decision, EngineError, decide};
pub use memory::InMemoryResourceClient;
pub use source::{SourceError, load_identifiers, read_identifiers};
