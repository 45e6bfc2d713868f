//! Wrapper of Gymnasium environments implemented in Python.
use crate::{DiscreteAct, FrameObs, GymEnvConfig};
use anyhow::Result;
use log::{info, trace};
use pyo3::types::{IntoPyDict, PyTuple};
use pyo3::{PyObject, Python, ToPyObject};
use volley_core::{Env, Info, Step};

/// Information given at every step of the interaction with the
/// environment. Currently empty.
pub struct GymInfo {}

impl Info for GymInfo {}

/// A Gymnasium Atari environment driven through the Python interpreter.
///
/// The environment object is created by the Python-side `atari_wrappers`
/// module, which applies the preprocessing stack before observations
/// reach Rust.
pub struct GymEnv {
    env: PyObject,
    n_actions: usize,
    obs_shape: Vec<usize>,

    /// Used at the first call of the reset method.
    initial_seed: Option<i64>,
}

impl Env for GymEnv {
    type Config = GymEnvConfig;
    type Obs = FrameObs;
    type Act = DiscreteAct;
    type Info = GymInfo;

    /// Constructs [`GymEnv`].
    ///
    /// * `seed` - The seed value of the random number generator, used at
    ///   the first call of the reset method.
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Python::with_gil(|py| {
            // sys.argv can be empty depending on the Python interpreter,
            // while some rendering backends read it.
            let locals = [("sys", py.import("sys")?)].into_py_dict(py);
            let _ = py.eval("sys.argv.insert(0, 'GymEnv')", None, Some(&locals))?;
            let ver = py.eval("sys.version", None, Some(&locals))?;
            info!("Initialize GymEnv");
            info!("Python version = {}", ver);

            let wrappers = py.import("atari_wrappers")?;
            let kwargs = vec![(
                "repeat_action_probability",
                config.repeat_action_probability,
            )]
            .into_py_dict(py);
            let env = wrappers
                .getattr("make_env")?
                .call((config.name.as_str(),), Some(kwargs))?;

            let action_space = env.getattr("action_space")?;
            let n_actions: usize = action_space.getattr("n")?.extract()?;
            let observation_space = env.getattr("observation_space")?;
            let obs_shape: Vec<usize> = observation_space.getattr("shape")?.extract()?;
            info!("Observation space = {:?}", obs_shape);

            Ok(GymEnv {
                env: env.into(),
                n_actions,
                obs_shape,
                initial_seed: Some(seed),
            })
        })
    }

    /// Resets the environment and returns an initial observation.
    fn reset(&mut self) -> Result<FrameObs> {
        trace!("GymEnv::reset()");

        Python::with_gil(|py| {
            let ret = if let Some(seed) = self.initial_seed.take() {
                let kwargs = vec![("seed", seed)].into_py_dict(py);
                self.env.call_method(py, "reset", (), Some(kwargs))?
            } else {
                self.env.call_method0(py, "reset")?
            };
            let ret: &PyTuple = ret.extract(py)?;
            let obs = ret.get_item(0).to_object(py);
            Ok(obs.into())
        })
    }

    /// Runs a step of the environment's dynamics.
    fn step(&mut self, a: &DiscreteAct) -> Result<Step<Self>> {
        trace!("GymEnv::step()");

        Python::with_gil(|py| {
            let a_py = a.into_pyobj(py);
            let ret = self.env.call_method(py, "step", (a_py,), None)?;
            let step: &PyTuple = ret.extract(py)?;

            let obs: FrameObs = step.get_item(0).to_object(py).into();
            let reward: f32 = step.get_item(1).extract()?;
            let is_terminated: bool = step.get_item(2).extract()?;
            let is_truncated: bool = step.get_item(3).extract()?;

            Ok(Step::new(
                obs,
                reward,
                is_terminated,
                is_truncated,
                GymInfo {},
            ))
        })
    }

    /// Draws a random action by calling `action_space.sample()`.
    fn sample_action(&mut self) -> DiscreteAct {
        Python::with_gil(|py| {
            let act_space = self.env.getattr(py, "action_space").unwrap();
            let a: i64 = act_space
                .call_method0(py, "sample")
                .unwrap()
                .extract(py)
                .unwrap();
            DiscreteAct(a)
        })
    }

    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn obs_shape(&self) -> &[usize] {
        &self.obs_shape
    }
}
