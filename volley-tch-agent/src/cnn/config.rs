use crate::model::OutDim;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`AtariCnn`](super::AtariCnn).
pub struct AtariCnnConfig {
    /// The number of stacked frames, i.e. input channels.
    pub n_stack: i64,

    /// The number of actions, i.e. output dimension.
    pub out_dim: i64,
}

impl Default for AtariCnnConfig {
    fn default() -> Self {
        Self {
            n_stack: 4,
            out_dim: 0,
        }
    }
}

impl OutDim for AtariCnnConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, v: i64) {
        self.out_dim = v;
    }
}
