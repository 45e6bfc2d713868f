//! Conversions into the tensor types of the value-function backend.
use crate::{DiscreteAct, FrameObs};
use tch::Tensor;
use volley_tch_agent::TensorBatch;

/// Adds the batch dimension, yielding `[1, n_stack, height, width]`.
impl From<FrameObs> for Tensor {
    fn from(obs: FrameObs) -> Tensor {
        let shape: Vec<i64> = obs.frames.shape().iter().map(|&x| x as i64).collect();
        let v: Vec<u8> = obs.frames.iter().copied().collect();
        Tensor::from_slice(&v).reshape(&shape[..]).unsqueeze(0)
    }
}

impl From<FrameObs> for TensorBatch {
    fn from(obs: FrameObs) -> TensorBatch {
        TensorBatch::from_tensor(obs.into())
    }
}

impl From<DiscreteAct> for TensorBatch {
    fn from(act: DiscreteAct) -> TensorBatch {
        TensorBatch::from_tensor(Tensor::from_slice(&[act.0]))
    }
}

impl From<Tensor> for DiscreteAct {
    fn from(t: Tensor) -> Self {
        use std::convert::TryFrom;
        Self(i64::try_from(t).expect("action tensor holds a single index"))
    }
}
