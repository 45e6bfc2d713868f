//! Hyperparameters of the Pong DQN run.
use crate::args::Args;
use volley_core::{replay_buffer::ReplayBufferConfig, EpsilonSchedule, TrainerConfig};
use volley_py_gym_env::GymEnvConfig;
use volley_tch_agent::{
    cnn::{AtariCnn, AtariCnnConfig},
    dqn::DqnConfig,
    OptimizerConfig, QNetConfig,
};

const GAMMA: f64 = 0.99;
const BATCH_SIZE: usize = 32;
const REPLAY_SIZE: usize = 10_000;
const LEARNING_RATE: f64 = 1e-4;
const SYNC_TARGET_FRAMES: usize = 1_000;
const REPLAY_START_SIZE: usize = 10_000;
const EPSILON_DECAY_LAST_FRAME: usize = 150_000;
const EPSILON_START: f64 = 1.0;
const EPSILON_FINAL: f64 = 0.01;
const MEAN_REWARD_BOUND: f32 = 19.0;
const MEAN_REWARD_WINDOW: usize = 100;
const N_STACK: i64 = 4;

/// Assembles the component configurations from the command line.
pub struct DqnPongConfig {
    pub args: Args,
}

impl From<Args> for DqnPongConfig {
    fn from(args: Args) -> Self {
        Self { args }
    }
}

impl DqnPongConfig {
    /// The last path segment of the environment name, used for file
    /// naming.
    pub fn run_name(&self) -> String {
        self.args.env.split('/').last().unwrap_or("dqn").to_string()
    }

    /// Directory receiving snapshots and TFRecord files.
    pub fn model_dir(&self) -> String {
        format!("./model/{}", self.run_name())
    }

    pub fn env_config(&self) -> GymEnvConfig {
        GymEnvConfig::default()
            .name(self.args.env.as_str())
            .repeat_action_probability(0.0)
    }

    pub fn replay_buffer_config(&self) -> ReplayBufferConfig {
        ReplayBufferConfig::default().capacity(REPLAY_SIZE)
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig::default()
            .sync_interval(SYNC_TARGET_FRAMES)
            .warmup_period(REPLAY_START_SIZE)
            .solve_mean_reward(MEAN_REWARD_BOUND)
            .mean_reward_window(MEAN_REWARD_WINDOW)
            .model_dir(self.model_dir())
            .run_name(self.run_name())
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        EpsilonSchedule {
            eps_start: EPSILON_START,
            eps_final: EPSILON_FINAL,
            decay_last_step: EPSILON_DECAY_LAST_FRAME,
        }
    }

    pub fn agent_config(&self, n_actions: i64) -> DqnConfig<AtariCnn> {
        let device = match self.args.cuda {
            true => tch::Device::cuda_if_available(),
            false => tch::Device::Cpu,
        };
        let model_config = QNetConfig::default()
            .q_config(AtariCnnConfig {
                n_stack: N_STACK,
                out_dim: n_actions,
            })
            .opt_config(OptimizerConfig::Adam { lr: LEARNING_RATE });

        DqnConfig::default()
            .model_config(model_config)
            .batch_size(BATCH_SIZE)
            .discount_factor(GAMMA)
            .device(device)
    }
}
