//! Environment-stepping actor.
use crate::replay_buffer::{BatchBase, ReplayBufferBase, Transition};
use crate::{Env, Policy};
use anyhow::Result;

/// Drives one environment episode at a time and feeds the replay buffer.
///
/// The actor owns the environment, the current observation and the
/// running episode-return accumulator; the replay buffer and the policy
/// are borrowed per step.
pub struct Actor<E: Env> {
    env: E,
    prev_obs: Option<E::Obs>,
    episode_return: f32,
}

impl<E: Env> Actor<E> {
    /// Creates an actor over a freshly built environment.
    pub fn new(env: E) -> Self {
        Self {
            env,
            prev_obs: None,
            episode_return: 0.0,
        }
    }

    /// The number of actions of the underlying environment.
    pub fn n_actions(&self) -> usize {
        self.env.n_actions()
    }

    /// Performs one interaction step.
    ///
    /// With probability `epsilon` a uniformly random action is drawn from
    /// the action space, otherwise the greedy action of `policy` (ties
    /// resolved to the first maximum by the policy). The resulting
    /// transition is pushed into `buffer` with `is_terminated` as its
    /// done flag; a time-limit truncation neither marks the transition
    /// terminal nor ends the episode here.
    ///
    /// Returns `Some(episode_return)` when this step terminated the
    /// episode, in which case the environment is reset and the
    /// accumulator zeroed; `None` otherwise. A return value of
    /// `Some(0.0)` is therefore distinct from `None`.
    pub fn step<P, R, O, A>(
        &mut self,
        policy: &mut P,
        buffer: &mut R,
        epsilon: f64,
    ) -> Result<Option<f32>>
    where
        P: Policy<E>,
        O: BatchBase + From<E::Obs>,
        A: BatchBase + From<E::Act>,
        R: ReplayBufferBase<Item = Transition<O, A>>,
    {
        let obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => self.env.reset()?,
        };

        let act = if fastrand::f64() < epsilon {
            self.env.sample_action()
        } else {
            policy.sample(&obs)
        };

        let step = self.env.step(&act)?;
        self.episode_return += step.reward;

        buffer.push(Transition::new(
            obs.into(),
            act.into(),
            step.obs.clone().into(),
            step.reward,
            step.is_terminated,
        ))?;

        if step.is_terminated {
            let episode_return = self.episode_return;
            self.episode_return = 0.0;
            self.prev_obs = Some(self.env.reset()?);
            Ok(Some(episode_return))
        } else {
            self.prev_obs = Some(step.obs);
            Ok(None)
        }
    }
}
