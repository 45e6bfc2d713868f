//! Configuration of the Gymnasium environment wrapper.
use serde::{Deserialize, Serialize};

/// Configuration of [`GymEnv`](crate::GymEnv).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GymEnvConfig {
    /// Name of the environment, e.g. `ALE/Pong-v5`.
    pub name: String,

    /// Probability of repeating the previous action, passed through to
    /// the Python-side wrapper (sticky actions).
    pub repeat_action_probability: f64,
}

impl Default for GymEnvConfig {
    fn default() -> Self {
        Self {
            name: "".to_string(),
            repeat_action_probability: 0.0,
        }
    }
}

impl GymEnvConfig {
    /// Sets the name of the environment.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the sticky-action probability.
    pub fn repeat_action_probability(mut self, v: f64) -> Self {
        self.repeat_action_probability = v;
        self
    }
}
