//! Type aliases.
use volley_core::replay_buffer::ReplayBuffer;
use volley_py_gym_env::GymEnv;
use volley_tch_agent::{cnn::AtariCnn, dqn::Dqn as Dqn_, TensorBatch};

pub type Env = GymEnv;
pub type ObsBatch = TensorBatch;
pub type ActBatch = TensorBatch;
pub type Buffer = ReplayBuffer<ObsBatch, ActBatch>;
pub type Actor = volley_core::Actor<Env>;
pub type Dqn = Dqn_<Env, AtariCnn, Buffer>;
