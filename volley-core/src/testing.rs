//! Stub environments, policies and column types shared by unit tests.
use crate::record::Record;
use crate::replay_buffer::{BatchBase, ReplayBuffer, ReplayBufferBase};
use crate::{Act, Agent, Env, Obs, Policy, Step};
use anyhow::Result;
use std::cell::Cell;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct F32Batch(pub Vec<f32>);

impl BatchBase for F32Batch {
    fn new(capacity: usize) -> Self {
        Self(vec![0.; capacity])
    }

    fn push(&mut self, ix: usize, data: &Self) {
        let capacity = self.0.len();
        for (k, v) in data.0.iter().enumerate() {
            self.0[(ix + k) % capacity] = *v;
        }
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self(ixs.iter().map(|&ix| self.0[ix]).collect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct I64Batch(pub Vec<i64>);

impl BatchBase for I64Batch {
    fn new(capacity: usize) -> Self {
        Self(vec![0; capacity])
    }

    fn push(&mut self, ix: usize, data: &Self) {
        let capacity = self.0.len();
        for (k, v) in data.0.iter().enumerate() {
            self.0[(ix + k) % capacity] = *v;
        }
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self(ixs.iter().map(|&ix| self.0[ix]).collect())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct StubObs(pub f32);

impl Obs for StubObs {}

impl From<StubObs> for F32Batch {
    fn from(obs: StubObs) -> Self {
        Self(vec![obs.0])
    }
}

#[derive(Clone, Debug)]
pub(crate) struct StubAct(pub i64);

impl Act for StubAct {}

impl From<StubAct> for I64Batch {
    fn from(act: StubAct) -> Self {
        Self(vec![act.0])
    }
}

#[derive(Clone, Debug)]
pub(crate) struct StubEnvConfig {
    /// Steps until termination; `0` means the episode never terminates.
    pub episode_len: usize,
    pub reward: f32,
}

/// Deterministic environment emitting a fixed reward per step.
pub(crate) struct StubEnv {
    config: StubEnvConfig,
    t: usize,
}

impl Env for StubEnv {
    type Config = StubEnvConfig;
    type Obs = StubObs;
    type Act = StubAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(StubObs(0.0))
    }

    fn step(&mut self, _a: &Self::Act) -> Result<Step<Self>> {
        self.t += 1;
        let is_terminated = self.config.episode_len > 0 && self.t >= self.config.episode_len;
        Ok(Step::new(
            StubObs(self.t as f32),
            self.config.reward,
            is_terminated,
            false,
            (),
        ))
    }

    fn sample_action(&mut self) -> Self::Act {
        StubAct(1)
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn obs_shape(&self) -> &[usize] {
        &[1]
    }
}

pub(crate) struct StubPolicy;

impl Policy<StubEnv> for StubPolicy {
    fn sample(&mut self, _obs: &StubObs) -> StubAct {
        StubAct(0)
    }
}

/// Agent counting optimization, sync and snapshot calls; each `opt`
/// samples one batch like a real agent would.
pub(crate) struct CountingAgent {
    pub batch_size: usize,
    pub n_opts: usize,
    pub n_syncs: usize,
    pub n_saves: Cell<usize>,
}

impl CountingAgent {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            n_opts: 0,
            n_syncs: 0,
            n_saves: Cell::new(0),
        }
    }
}

impl Policy<StubEnv> for CountingAgent {
    fn sample(&mut self, _obs: &StubObs) -> StubAct {
        StubAct(0)
    }
}

impl Agent<StubEnv, ReplayBuffer<F32Batch, I64Batch>> for CountingAgent {
    fn opt(&mut self, buffer: &mut ReplayBuffer<F32Batch, I64Batch>) -> Result<Record> {
        let _ = buffer.batch(self.batch_size)?;
        self.n_opts += 1;
        Ok(Record::empty())
    }

    fn sync(&mut self) -> Result<()> {
        self.n_syncs += 1;
        Ok(())
    }

    fn save_params(&self, _path: &Path) -> Result<()> {
        self.n_saves.set(self.n_saves.get() + 1);
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
