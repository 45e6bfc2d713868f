//! DQN agent implemented with tch-rs.
use super::DqnConfig;
use crate::model::{OutDim, QNet, SubModel};
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::convert::TryFrom;
use std::{fs, marker::PhantomData, path::Path};
use tch::{no_grad, Device, Kind, Reduction, Tensor};
use volley_core::{
    record::{Record, RecordValue},
    replay_buffer::{ReplayBufferBase, TransitionBatchBase},
    Agent, Configurable, Env, Policy, VolleyError,
};

/// One-step bootstrapped Bellman target.
///
/// `not_done` zeroes the continuation value exactly at terminal
/// transitions, leaving only the immediate reward there.
fn bellman_target(reward: &Tensor, not_done: &Tensor, next_q: &Tensor, discount_factor: f64) -> Tensor {
    reward + not_done * discount_factor * next_q
}

/// DQN agent.
///
/// Holds the online Q-network under optimization and a structurally
/// identical target network whose parameters are a hard copy taken at
/// every [`sync`](Agent::sync). The greedy policy reads the online
/// network; the Bellman target reads the frozen target network.
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatchBase,
    <R::Batch as TransitionBatchBase>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatchBase>::ActBatch: Into<Tensor>,
{
    pub(super) qnet: QNet<Q>,
    pub(super) qnet_tgt: QNet<Q>,
    pub(super) batch_size: usize,
    pub(super) discount_factor: f64,
    pub(super) device: Device,
    pub(super) n_opts: usize,
    pub(super) phantom: PhantomData<(E, R)>,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatchBase,
    <R::Batch as TransitionBatchBase>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatchBase>::ActBatch: Into<Tensor>,
{
    fn update_critic(&mut self, buffer: &mut R) -> Result<f32> {
        let batch = buffer.batch(self.batch_size)?;
        let (obs, act, next_obs, reward, is_terminated) = batch.unpack();
        let obs = obs.into();
        let act = act.into().to_kind(Kind::Int64).to(self.device);
        let next_obs = next_obs.into();
        let reward = Tensor::from_slice(&reward[..]).to(self.device);
        let not_done: Vec<f32> = is_terminated.iter().map(|&d| 1.0 - d as f32).collect();
        let not_done = Tensor::from_slice(&not_done[..]).to(self.device);

        // The value the online network assigns to the action actually
        // taken, not to its current maximum.
        let pred = {
            let x = self.qnet.forward(&obs);
            x.gather(-1, &act.unsqueeze(-1), false).squeeze_dim(-1)
        };

        // The target network output is a constant for this batch; no
        // gradient flows through it.
        let tgt = no_grad(|| {
            let (next_q, _) = self.qnet_tgt.forward(&next_obs).max_dim(-1, false);
            bellman_target(&reward, &not_done, &next_q, self.discount_factor)
        });

        let loss = pred.mse_loss(&tgt, Reduction::Mean);
        self.qnet.backward_step(&loss);

        Ok(f32::try_from(loss)?)
    }

    #[cfg(test)]
    pub(crate) fn online_values(&self, x: &Q::Input) -> Tensor {
        no_grad(|| self.qnet.forward(x))
    }

    #[cfg(test)]
    pub(crate) fn target_values(&self, x: &Q::Input) -> Tensor {
        no_grad(|| self.qnet_tgt.forward(x))
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatchBase,
    <R::Batch as TransitionBatchBase>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatchBase>::ActBatch: Into<Tensor>,
{
    /// Returns the greedy action w.r.t. the online network.
    ///
    /// Ties resolve to the first maximum, so the choice is deterministic
    /// for fixed inputs and parameters.
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        no_grad(|| {
            let q = self.qnet.forward(&obs.clone().into());
            q.argmax(-1, true).into()
        })
    }
}

impl<E, Q, R> Configurable for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatchBase,
    <R::Batch as TransitionBatchBase>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatchBase>::ActBatch: Into<Tensor>,
{
    type Config = DqnConfig<Q>;

    fn build(config: Self::Config) -> Result<Self> {
        let device: Device = config
            .device
            .ok_or_else(|| {
                VolleyError::InvalidConfig("no device given for the DQN agent".into())
            })?
            .into();
        if config.batch_size == 0 {
            return Err(VolleyError::InvalidConfig("batch size must be positive".into()).into());
        }
        if !(0.0..=1.0).contains(&config.discount_factor) {
            return Err(
                VolleyError::InvalidConfig("discount factor must lie in [0, 1]".into()).into(),
            );
        }

        let qnet = QNet::build(config.model_config, device)?;
        let qnet_tgt = qnet.clone();

        Ok(Dqn {
            qnet,
            qnet_tgt,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            device,
            n_opts: 0,
            phantom: PhantomData,
        })
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatchBase,
    <R::Batch as TransitionBatchBase>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatchBase>::ActBatch: Into<Tensor>,
{
    fn opt(&mut self, buffer: &mut R) -> Result<Record> {
        let loss = self.update_critic(buffer)?;
        self.n_opts += 1;
        Ok(Record::from_slice(&[(
            "loss",
            RecordValue::Scalar(loss),
        )]))
    }

    fn sync(&mut self) -> Result<()> {
        self.qnet_tgt.copy_from(&self.qnet)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.qnet.save(path)
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path)?;
        self.qnet_tgt.load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QNetConfig;
    use crate::opt::OptimizerConfig;
    use crate::tensor_batch::TensorBatch;
    use serde::Deserialize;
    use std::convert::TryFrom;
    use tch::{nn, nn::Module};
    use tempdir::TempDir;
    use volley_core::replay_buffer::{
        ReplayBuffer, ReplayBufferConfig, Transition,
    };
    use volley_core::{Act, Obs, Step};

    #[derive(Clone, Debug)]
    struct TestObs(Vec<f32>);

    impl Obs for TestObs {}

    impl From<TestObs> for Tensor {
        fn from(obs: TestObs) -> Tensor {
            Tensor::from_slice(&obs.0).unsqueeze(0)
        }
    }

    impl From<TestObs> for TensorBatch {
        fn from(obs: TestObs) -> TensorBatch {
            TensorBatch::from_tensor(obs.into())
        }
    }

    #[derive(Clone, Debug)]
    struct TestAct(i64);

    impl Act for TestAct {}

    impl From<Tensor> for TestAct {
        fn from(t: Tensor) -> Self {
            Self(i64::try_from(t).unwrap())
        }
    }

    impl From<TestAct> for TensorBatch {
        fn from(act: TestAct) -> TensorBatch {
            TensorBatch::from_tensor(Tensor::from_slice(&[act.0]))
        }
    }

    /// Type-level stand-in; the agent tests never step an environment.
    struct TestEnv;

    impl Env for TestEnv {
        type Config = ();
        type Obs = TestObs;
        type Act = TestAct;
        type Info = ();

        fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
            unimplemented!();
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            unimplemented!();
        }

        fn step(&mut self, _a: &Self::Act) -> Result<Step<Self>> {
            unimplemented!();
        }

        fn sample_action(&mut self) -> Self::Act {
            unimplemented!();
        }

        fn n_actions(&self) -> usize {
            unimplemented!();
        }

        fn obs_shape(&self) -> &[usize] {
            unimplemented!();
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct LinearQConfig {
        in_dim: i64,
        out_dim: i64,
    }

    impl OutDim for LinearQConfig {
        fn get_out_dim(&self) -> i64 {
            self.out_dim
        }

        fn set_out_dim(&mut self, v: i64) {
            self.out_dim = v;
        }
    }

    struct LinearQ {
        config: LinearQConfig,
        device: Device,
        seq: nn::Sequential,
    }

    impl SubModel for LinearQ {
        type Config = LinearQConfig;
        type Input = Tensor;
        type Output = Tensor;

        fn build(var_store: &nn::VarStore, config: Self::Config) -> Self {
            let seq = nn::seq().add(nn::linear(
                &var_store.root() / "l1",
                config.in_dim,
                config.out_dim,
                Default::default(),
            ));
            Self {
                config,
                device: var_store.device(),
                seq,
            }
        }

        fn clone_with_var_store(&self, var_store: &nn::VarStore) -> Self {
            Self::build(var_store, self.config.clone())
        }

        fn forward(&self, x: &Self::Input) -> Tensor {
            self.seq.forward(&x.to(self.device))
        }
    }

    type Buffer = ReplayBuffer<TensorBatch, TensorBatch>;
    type TestDqn = Dqn<TestEnv, LinearQ, Buffer>;

    fn agent() -> TestDqn {
        let model_config = QNetConfig::default()
            .q_config(LinearQConfig {
                in_dim: 4,
                out_dim: 2,
            })
            .opt_config(OptimizerConfig::Adam { lr: 0.01 });
        let config = DqnConfig::default()
            .model_config(model_config)
            .batch_size(8)
            .discount_factor(0.9)
            .device(tch::Device::Cpu);
        Dqn::build(config).unwrap()
    }

    fn filled_buffer(seed: u64) -> Buffer {
        let mut buffer =
            Buffer::build(&ReplayBufferConfig::default().capacity(16).seed(seed)).unwrap();
        for k in 0..16 {
            let obs = TestObs(vec![0.1 * k as f32, 0.2, -0.1, 0.3]);
            let next_obs = TestObs(vec![0.1 * k as f32 + 0.05, 0.2, -0.1, 0.3]);
            buffer
                .push(Transition::new(
                    obs.into(),
                    TestAct(k % 2).into(),
                    next_obs.into(),
                    1.0,
                    k % 5 == 0,
                ))
                .unwrap();
        }
        buffer
    }

    fn probe() -> Tensor {
        Tensor::from_slice(&[0.1f32, 0.2, -0.1, 0.3]).unsqueeze(0)
    }

    #[test]
    fn rejects_degenerate_configs() {
        let model_config = QNetConfig::default()
            .q_config(LinearQConfig {
                in_dim: 4,
                out_dim: 2,
            })
            .opt_config(OptimizerConfig::Adam { lr: 0.01 });

        // No device given.
        let config = DqnConfig::<LinearQ>::default().model_config(model_config.clone());
        assert!(TestDqn::build(config).is_err());

        let config = DqnConfig::<LinearQ>::default()
            .model_config(model_config.clone())
            .batch_size(0)
            .device(tch::Device::Cpu);
        assert!(TestDqn::build(config).is_err());

        let config = DqnConfig::<LinearQ>::default()
            .model_config(model_config)
            .discount_factor(1.5)
            .device(tch::Device::Cpu);
        assert!(TestDqn::build(config).is_err());
    }

    #[test]
    fn terminal_transitions_keep_only_the_reward() {
        let reward = Tensor::from_slice(&[1.0f32, 2.0]);
        let not_done = Tensor::from_slice(&[0.0f32, 1.0]);
        let next_q = Tensor::from_slice(&[100.0f32, 10.0]);

        let tgt = bellman_target(&reward, &not_done, &next_q, 0.9);
        let values = Vec::<f32>::try_from(&tgt).unwrap();

        // Terminal: the continuation value is zeroed whatever next_q is.
        assert_eq!(values[0], 1.0);
        assert!((values[1] - 11.0).abs() < 1e-6);
    }

    #[test]
    fn target_network_is_frozen_between_syncs() {
        tch::manual_seed(7);
        let mut agent = agent();
        let mut buffer = filled_buffer(1);
        let probe = probe();

        let before = agent.target_values(&probe);
        for _ in 0..3 {
            agent.opt(&mut buffer).unwrap();
        }
        let after = agent.target_values(&probe);
        assert!(before.allclose(&after, 1e-12, 1e-12, false));

        // The online network did move.
        let online = agent.online_values(&probe);
        assert!(!online.allclose(&after, 1e-6, 1e-6, false));
    }

    #[test]
    fn sync_hard_copies_the_online_parameters() {
        tch::manual_seed(7);
        let mut agent = agent();
        let mut buffer = filled_buffer(1);
        let probe = probe();

        for _ in 0..3 {
            agent.opt(&mut buffer).unwrap();
        }
        agent.sync().unwrap();

        let online = agent.online_values(&probe);
        let target = agent.target_values(&probe);
        assert!(online.allclose(&target, 1e-12, 1e-12, false));
    }

    #[test]
    fn identical_target_parameters_give_identical_losses() {
        tch::manual_seed(7);
        let mut agent_a = agent();
        let mut buffer_a = filled_buffer(3);
        tch::manual_seed(7);
        let mut agent_b = agent();
        let mut buffer_b = filled_buffer(3);

        let loss_a = agent_a.opt(&mut buffer_a).unwrap().get_scalar("loss").unwrap();
        let loss_b = agent_b.opt(&mut buffer_b).unwrap().get_scalar("loss").unwrap();
        assert_eq!(loss_a, loss_b);

        // Syncing only one of the two changes its target parameters and
        // with them the next loss.
        agent_a.sync().unwrap();
        let loss_a = agent_a.opt(&mut buffer_a).unwrap().get_scalar("loss").unwrap();
        let loss_b = agent_b.opt(&mut buffer_b).unwrap().get_scalar("loss").unwrap();
        assert_ne!(loss_a, loss_b);
    }

    #[test]
    fn greedy_action_is_the_argmax_of_the_online_network() {
        tch::manual_seed(7);
        let mut agent = agent();
        let obs = TestObs(vec![0.1, 0.2, -0.1, 0.3]);

        let act = Policy::<TestEnv>::sample(&mut agent, &obs);
        let q = agent.online_values(&probe());
        assert_eq!(act.0, i64::try_from(q.argmax(-1, true)).unwrap());
    }

    #[test]
    fn params_roundtrip_through_save_and_load() -> Result<()> {
        tch::manual_seed(7);
        let mut agent = agent();
        let mut buffer = filled_buffer(5);
        let probe = probe();

        let dir = TempDir::new("dqn_params")?;
        let path = dir.path().join("qnet.pt");
        let before = agent.online_values(&probe);
        agent.save_params(&path)?;

        for _ in 0..2 {
            agent.opt(&mut buffer)?;
        }
        assert!(!agent.online_values(&probe).allclose(&before, 1e-6, 1e-6, false));

        agent.load_params(&path)?;
        assert!(agent.online_values(&probe).allclose(&before, 1e-12, 1e-12, false));
        Ok(())
    }
}
