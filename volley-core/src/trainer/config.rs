//! Configuration of [`Trainer`](super::Trainer).
use crate::error::VolleyError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// Interval of hard target-network syncs in environment steps.
    pub sync_interval: usize,

    /// Minimal replay-buffer occupancy before optimization starts.
    pub warmup_period: usize,

    /// Training stops once the rolling mean episode reward exceeds this.
    pub solve_mean_reward: f32,

    /// Number of completed episodes the rolling mean is taken over.
    pub mean_reward_window: usize,

    /// Interval of recording agent information in environment steps.
    pub record_agent_info_interval: usize,

    /// Stop after this many environment steps; `0` means no limit.
    pub max_env_steps: usize,

    /// Where to save the best-model snapshots. `None` disables saving.
    pub model_dir: Option<String>,

    /// Base name of snapshot files, typically derived from the
    /// environment identifier.
    pub run_name: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            sync_interval: 1_000,
            warmup_period: 10_000,
            solve_mean_reward: 19.0,
            mean_reward_window: 100,
            record_agent_info_interval: 1_000,
            max_env_steps: 0,
            model_dir: None,
            run_name: "dqn".to_string(),
        }
    }
}

impl TrainerConfig {
    /// Sets the target-network sync interval in environment steps.
    pub fn sync_interval(mut self, v: usize) -> Self {
        self.sync_interval = v;
        self
    }

    /// Sets the warm-up period in stored transitions.
    pub fn warmup_period(mut self, v: usize) -> Self {
        self.warmup_period = v;
        self
    }

    /// Sets the mean reward at which the task counts as solved.
    pub fn solve_mean_reward(mut self, v: f32) -> Self {
        self.solve_mean_reward = v;
        self
    }

    /// Sets the size of the rolling episode-reward window.
    pub fn mean_reward_window(mut self, v: usize) -> Self {
        self.mean_reward_window = v;
        self
    }

    /// Sets the interval of recording agent information.
    pub fn record_agent_info_interval(mut self, v: usize) -> Self {
        self.record_agent_info_interval = v;
        self
    }

    /// Sets the maximal number of environment steps (`0` = unlimited).
    pub fn max_env_steps(mut self, v: usize) -> Self {
        self.max_env_steps = v;
        self
    }

    /// Sets the directory for best-model snapshots.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Sets the base name of snapshot files.
    pub fn run_name(mut self, v: impl Into<String>) -> Self {
        self.run_name = v.into();
        self
    }

    /// Validates the configuration.
    pub fn check(&self) -> Result<(), VolleyError> {
        if self.sync_interval == 0 {
            return Err(VolleyError::InvalidConfig(
                "sync interval must be positive".into(),
            ));
        }
        if self.mean_reward_window == 0 {
            return Err(VolleyError::InvalidConfig(
                "mean reward window must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`] to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
