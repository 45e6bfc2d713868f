//! Agent.
use super::{Env, Policy};
use crate::record::Record;
use crate::replay_buffer::ReplayBufferBase;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// The agent owns the online and target value functions. The training
/// loop decides *when* to optimize and to synchronize; the agent decides
/// *how*.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Performs one optimization step on a batch sampled from `buffer`.
    ///
    /// Returns a [`Record`] with information about the step, such as the
    /// value of the loss function.
    fn opt(&mut self, buffer: &mut R) -> Result<Record>;

    /// Hard-copies the online value-function parameters into the target
    /// value function.
    fn sync(&mut self) -> Result<()>;

    /// Saves the online value-function parameters to the given path.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads value-function parameters from the given path.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
