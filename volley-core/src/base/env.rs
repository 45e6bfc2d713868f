//! Environment.
use super::{Act, Info, Obs, Step};
use anyhow::Result;

/// Represents an environment with a discrete action space, typically an MDP.
///
/// Any failure of the underlying simulation backend is fatal and must be
/// propagated to the caller; implementations do not retry.
pub trait Env {
    /// Configuration.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns an initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Draws a uniformly random action from the action space.
    fn sample_action(&mut self) -> Self::Act;

    /// The number of available actions.
    fn n_actions(&self) -> usize;

    /// The shape of observations.
    fn obs_shape(&self) -> &[usize];
}
