use super::{Record, Recorder};

/// A recorder that ignores any record. Used in tests.
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    fn write(&mut self, _env_step: usize, _record: Record) {}
}
