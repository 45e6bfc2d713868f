//! Errors of the training loop and its stores.
use thiserror::Error;

/// Error variants raised by this crate.
#[derive(Debug, Error)]
pub enum VolleyError {
    /// A batch was requested that the replay buffer cannot serve.
    #[error("requested a batch of {requested} transitions, buffer holds {len}")]
    InsufficientData {
        /// Requested batch size.
        requested: usize,
        /// Current buffer occupancy.
        len: usize,
    },

    /// An invalid hyperparameter was detected at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A record value was accessed with the wrong type.
    #[error("expected record value of type {0}")]
    RecordValueType(String),

    /// A record key was not found.
    #[error("record key not found: {0}")]
    RecordKey(String),
}
