//! Observations of Atari environments.
use crate::util::pyobj_to_arrayd;
use ndarray::ArrayD;
use pyo3::PyObject;
use volley_core::Obs;

/// A stack of preprocessed frames, as produced by the Python-side
/// wrapper: `u8` pixel intensities of shape `[n_stack, height, width]`.
#[derive(Clone, Debug)]
pub struct FrameObs {
    /// Stacked frames.
    pub frames: ArrayD<u8>,
}

impl Obs for FrameObs {}

impl From<ArrayD<u8>> for FrameObs {
    fn from(frames: ArrayD<u8>) -> Self {
        Self { frames }
    }
}

/// Converts a numpy array of Python into [`FrameObs`].
impl From<PyObject> for FrameObs {
    fn from(obs: PyObject) -> Self {
        Self {
            frames: pyobj_to_arrayd::<u8, u8>(obs),
        }
    }
}
