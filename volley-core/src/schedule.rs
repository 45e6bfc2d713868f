//! Exploration schedule.
use crate::error::VolleyError;
use serde::{Deserialize, Serialize};

/// Linearly decaying exploration probability for an epsilon-greedy policy.
///
/// `eps(step)` falls from `eps_start` by `1 / decay_last_step` per
/// environment step and floors at `eps_final`. The schedule holds no
/// mutable state; the caller owns the step counter.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonSchedule {
    /// Exploration probability at step 0.
    pub eps_start: f64,

    /// Floor of the exploration probability.
    pub eps_final: f64,

    /// The step at which the linear decay would reach zero.
    pub decay_last_step: usize,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_final: 0.01,
            decay_last_step: 150_000,
        }
    }
}

impl EpsilonSchedule {
    /// Constructs a validated schedule.
    pub fn new(
        eps_start: f64,
        eps_final: f64,
        decay_last_step: usize,
    ) -> Result<Self, VolleyError> {
        let schedule = Self {
            eps_start,
            eps_final,
            decay_last_step,
        };
        schedule.check()?;
        Ok(schedule)
    }

    /// Validates the schedule parameters.
    pub fn check(&self) -> Result<(), VolleyError> {
        if self.decay_last_step == 0 {
            return Err(VolleyError::InvalidConfig(
                "epsilon decay horizon must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.eps_final) || !(0.0..=1.0).contains(&self.eps_start) {
            return Err(VolleyError::InvalidConfig(
                "epsilon bounds must lie in [0, 1]".into(),
            ));
        }
        if self.eps_final > self.eps_start {
            return Err(VolleyError::InvalidConfig(
                "final epsilon must not exceed initial epsilon".into(),
            ));
        }
        Ok(())
    }

    /// The exploration probability at the given environment step.
    pub fn eps(&self, step: usize) -> f64 {
        (self.eps_start - step as f64 / self.decay_last_step as f64).max(self.eps_final)
    }
}
