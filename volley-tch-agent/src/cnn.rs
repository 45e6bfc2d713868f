//! Convolutional neural network for Atari frames.
//!
//! The architecture is the one of the DQN Nature paper. The input array
//! is scaled by 1/255 in the graph, casting pixel intensities from `u8`
//! to `f32`.
mod base;
mod config;
pub use base::AtariCnn;
pub use config::AtariCnnConfig;
