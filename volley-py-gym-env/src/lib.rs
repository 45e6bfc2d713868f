//! A wrapper of [Gymnasium](https://gymnasium.farama.org) Atari
//! environments on Python.
//!
//! [`GymEnv`] drives a Gymnasium environment through
//! [`PyO3`](https://github.com/PyO3/pyo3). Environment construction is
//! delegated to a Python-side `atari_wrappers` module, which owns the
//! usual preprocessing stack (frame resizing, gray-scaling, frame
//! stacking, reward clipping); the Rust side only converts the resulting
//! numpy frames into [`ndarray`] arrays and, with the `tch` feature,
//! into the tensor types consumed by the value functions.
mod act;
mod base;
mod config;
mod obs;
#[cfg(feature = "tch")]
mod tensor;
pub mod util;

pub use act::DiscreteAct;
pub use base::{GymEnv, GymInfo};
pub use config::GymEnvConfig;
pub use obs::FrameObs;
