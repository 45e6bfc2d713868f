//! TensorBoard backend of the [`Recorder`] interface.
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;
use volley_core::record::{Record, RecordValue, Recorder};

/// Writes scalar time series to TFRecord files.
///
/// Series are keyed by the global environment-step counter passed to
/// [`Recorder::write`]. Non-scalar record values are ignored.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
}

impl TensorboardRecorder {
    /// Constructs a [`TensorboardRecorder`].
    ///
    /// TFRecord files are stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
        }
    }
}

impl Recorder for TensorboardRecorder {
    fn write(&mut self, env_step: usize, record: Record) {
        for (k, v) in record.iter() {
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, env_step),
                _ => {}
            };
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}
