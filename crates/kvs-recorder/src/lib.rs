//! # kvs-recorder
//!
//! Outcome logs for the KVS retention standardizer.
//!
//! Every processed stream produces exactly one [`OutcomeRecord`](kvs_core::OutcomeRecord),
//! which is appended to one of three files:
//!
//! | Outcome | File | Format |
//! |---------|------|--------|
//! | `SUCCESS` | success log | `<arn> - Success` |
//! | `FAILURE` | failure log | `<arn> - <error detail>` |
//! | `INFO` | info log | one JSON object per line |
//!
//! Files are only ever opened in append mode, so repeated runs accumulate
//! history instead of overwriting it.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kvs_core::{LogsConfig, OutcomeRecord, ResourceIdentifier, AdjustmentDirection};
//! use kvs_recorder::OutcomeRecorder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = OutcomeRecorder::new(&LogsConfig::default());
//! let arn = ResourceIdentifier::parse("arn:aws:kinesisvideo:us-east-1:123:stream/cam/1").unwrap();
//! recorder
//!     .record(&OutcomeRecord::success(arn, AdjustmentDirection::Increase, 24))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod recorder;
pub mod storage;

pub use entry::{InfoEntry, failure_line, success_line};
pub use error::RecorderError;
pub use recorder::OutcomeRecorder;
pub use storage::{FileStorage, MemoryStorage, NullStorage, OutcomeStorage};
