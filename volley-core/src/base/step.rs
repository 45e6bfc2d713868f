//! Environment step.
use super::Env;

/// Additional information to `Obs` and `Act`.
pub trait Info {}

impl Info for () {}

/// The outcome of a single environment step.
///
/// `is_terminated` and `is_truncated` are distinct on purpose: only a
/// terminal state ends an episode for bootstrapping, while a time-limit
/// truncation does not.
pub struct Step<E: Env> {
    /// Observation after the step.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// The episode reached a terminal state.
    pub is_terminated: bool,

    /// The episode was cut off, e.g. by a time limit.
    pub is_truncated: bool,

    /// Information defined by the environment.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }
}
