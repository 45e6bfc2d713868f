//! Records of training metrics and their sinks.
mod base;
mod null_recorder;
mod recorder;
pub use base::{Record, RecordValue};
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
