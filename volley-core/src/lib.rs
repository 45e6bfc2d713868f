#![warn(missing_docs)]
//! Backend-agnostic building blocks of a deep Q-learning training loop.
//!
//! The crate provides the abstractions connecting an environment, a
//! trainable policy and a replay buffer ([`Env`], [`Policy`], [`Agent`],
//! [`replay_buffer`]), together with the objects driving them: the
//! [`Actor`] performing environment interaction, the [`EpsilonSchedule`]
//! controlling exploration and the [`Trainer`] running the loop until
//! convergence. Value-function backends and concrete environments live in
//! their own crates.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod actor;
mod base;
mod schedule;
mod trainer;

pub use actor::Actor;
pub use base::{Act, Agent, Configurable, Env, Info, Obs, Policy, Step};
pub use error::VolleyError;
pub use schedule::EpsilonSchedule;
pub use trainer::{TrainPhase, Trainer, TrainerConfig};

#[cfg(test)]
pub(crate) mod testing;
