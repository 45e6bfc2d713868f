//! Interfaces and containers of Q-networks.
use crate::opt::{Optimizer, OptimizerConfig};
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;
use tch::{nn, nn::VarStore, Device, Tensor};

/// A network module constructed over a shared [`VarStore`].
///
/// Keeping construction parametric over the variable store makes it
/// possible to clone a network into a second store, which is how the
/// target network of a DQN agent is created.
pub trait SubModel {
    /// Configuration from which the module is constructed.
    type Config;

    /// Input of the module.
    type Input;

    /// Output of the module.
    type Output;

    /// Builds the module, registering its variables in `var_store`.
    fn build(var_store: &VarStore, config: Self::Config) -> Self;

    /// Rebuilds the module over another [`VarStore`].
    fn clone_with_var_store(&self, var_store: &VarStore) -> Self;

    /// Performs forward computation.
    fn forward(&self, input: &Self::Input) -> Self::Output;
}

/// Interface for handling output dimensions of network configurations.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Configuration of [`QNet`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QNetConfig<Q>
where
    Q: OutDim,
{
    pub(crate) q_config: Option<Q>,
    pub(crate) opt_config: OptimizerConfig,
}

impl<Q> Default for QNetConfig<Q>
where
    Q: OutDim,
{
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::Adam { lr: 0.0 },
        }
    }
}

impl<Q> QNetConfig<Q>
where
    Q: DeserializeOwned + Serialize + OutDim,
{
    /// Sets the configuration of the action-value network.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets the output dimension of the network.
    pub fn out_dim(mut self, v: i64) -> Self {
        if let Some(q_config) = &mut self.q_config {
            q_config.set_out_dim(v);
        }
        self
    }

    /// Sets the optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }
}

/// An action-value function: a network module together with its variable
/// store and optimizer.
pub struct QNet<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    device: Device,
    var_store: VarStore,

    // Dimension of the output vector (equal to the number of actions).
    out_dim: i64,

    q: Q,

    opt_config: OptimizerConfig,
    opt: Optimizer,
}

impl<Q> QNet<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    /// Builds a Q-network on the given device.
    pub fn build(config: QNetConfig<Q::Config>, device: Device) -> Result<Self> {
        let q_config = config.q_config.ok_or_else(|| {
            volley_core::VolleyError::InvalidConfig("no Q-network configuration given".into())
        })?;
        let out_dim = q_config.get_out_dim();
        let var_store = nn::VarStore::new(device);
        let q = Q::build(&var_store, q_config);
        let opt = config.opt_config.build(&var_store)?;

        Ok(Self {
            device,
            var_store,
            out_dim,
            q,
            opt_config: config.opt_config,
            opt,
        })
    }

    /// Outputs the action values given an observation.
    pub fn forward(&self, x: &Q::Input) -> Tensor {
        let a = self.q.forward(x);
        debug_assert_eq!(a.size().as_slice()[1], self.out_dim);
        a
    }

    /// Accumulates gradients of `loss` and applies an optimizer step.
    pub fn backward_step(&mut self, loss: &Tensor) {
        self.opt.backward_step(loss);
    }

    /// Hard-copies all parameters of `src` into this network.
    pub fn copy_from(&mut self, src: &Self) -> Result<()> {
        self.var_store.copy(&src.var_store)?;
        Ok(())
    }

    /// The device this network lives on.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Saves the parameters to the given path.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Saved Q-network parameters to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads parameters from the given path.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Loaded Q-network parameters from {:?}", path.as_ref());
        Ok(())
    }
}

impl<Q> Clone for QNet<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    fn clone(&self) -> Self {
        let device = self.device;
        let opt_config = self.opt_config.clone();
        let var_store = nn::VarStore::new(device);
        let q = self.q.clone_with_var_store(&var_store);
        let opt = opt_config.build(&var_store).unwrap();

        let mut cloned = Self {
            device,
            var_store,
            out_dim: self.out_dim,
            q,
            opt_config,
            opt,
        };
        cloned.var_store.copy(&self.var_store).unwrap();
        cloned
    }
}
