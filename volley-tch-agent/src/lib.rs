//! DQN agent implemented with [tch](https://crates.io/crates/tch).
pub mod cnn;
pub mod dqn;
mod model;
mod opt;
mod tensor_batch;
use serde::{Deserialize, Serialize};

pub use model::{OutDim, QNet, QNetConfig, SubModel};
pub use opt::{Optimizer, OptimizerConfig};
pub use tensor_batch::TensorBatch;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Execution device of the value functions.
///
/// This enum is added because [`tch::Device`] does not support
/// serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// A GPU device.
    Cuda(usize),
}

impl From<tch::Device> for Device {
    fn from(device: tch::Device) -> Self {
        match device {
            tch::Device::Cpu => Self::Cpu,
            tch::Device::Cuda(n) => Self::Cuda(n),
            _ => unimplemented!(),
        }
    }
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(n) => tch::Device::Cuda(n),
        }
    }
}
