//! Actions of Atari environments.
use pyo3::{IntoPy, PyObject, Python};
use volley_core::Act;

/// A discrete action, an index into the environment's action space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscreteAct(pub i64);

impl Act for DiscreteAct {}

impl DiscreteAct {
    /// Converts the action into a Python object.
    pub fn into_pyobj(&self, py: Python) -> PyObject {
        self.0.into_py(py)
    }
}
