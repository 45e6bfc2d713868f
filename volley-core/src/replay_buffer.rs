//! Replay buffer of environment transitions.
//!
//! Training on consecutive transitions would correlate the samples of a
//! batch; storing a sliding window of recent history and drawing uniform
//! random batches from it is what decorrelates them. The buffer is a
//! fixed-capacity ring: once full, a new transition evicts the oldest one,
//! which keeps the stored history fresh relative to the current policy.
mod base;
mod batch;
mod config;
pub use base::{ReplayBuffer, ReplayBufferBase};
pub use batch::{BatchBase, Transition, TransitionBatch, TransitionBatchBase};
pub use config::ReplayBufferConfig;
