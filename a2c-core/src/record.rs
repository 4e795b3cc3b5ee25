//! Types and traits for recording training metrics.
//!
//! * [`Record`] - A container of key-value pairs of various data types
//! * [`RecordValue`] - Values that can be stored in a [`Record`]
//! * [`Recorder`] - Writes records to some destination
//! * [`RecordStorage`] - Aggregates records, e.g. the per-step losses of an episode
//! * [`BufferedRecorder`] - Keeps records in memory
//! * [`NullRecorder`] - Discards all records
//!
//! ```rust
//! use a2c_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(3.0));
//! record.insert("score_avg", RecordValue::Scalar(21.5));
//! assert_eq!(record.get_scalar("score_avg").unwrap(), 21.5);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
