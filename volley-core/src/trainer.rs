//! Training loop orchestration.
mod config;
use crate::record::{Record, RecordValue::Scalar, Recorder};
use crate::replay_buffer::{BatchBase, ReplayBufferBase, Transition};
use crate::{Actor, Agent, Env, EpsilonSchedule};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

/// Phase of the training loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainPhase {
    /// Collecting transitions only; the buffer is below the warm-up size.
    Warmup,

    /// Environment steps interleaved with optimization steps.
    Training,

    /// The rolling mean episode reward crossed the solve threshold.
    Converged,
}

/// Manages the training loop and its bookkeeping.
///
/// Each tick performs one environment step through the [`Actor`] and,
/// once the replay buffer has reached the warm-up size, one optimization
/// step of the [`Agent`]. The target network is hard-synced whenever the
/// global step counter hits a multiple of the sync interval. Episode
/// rewards feed a rolling window whose mean decides convergence; an
/// improvement of that mean persists the online parameters.
pub struct Trainer {
    sync_interval: usize,
    warmup_period: usize,
    solve_mean_reward: f32,
    mean_reward_window: usize,
    record_agent_info_interval: usize,
    max_env_steps: usize,
    model_dir: Option<String>,
    run_name: String,
    schedule: EpsilonSchedule,
    phase: TrainPhase,
    env_steps: usize,
    episodes: usize,
    episode_rewards: VecDeque<f32>,
    best_mean_reward: Option<f32>,
}

impl Trainer {
    /// Constructs a trainer, validating configuration and schedule.
    pub fn build(config: TrainerConfig, schedule: EpsilonSchedule) -> Result<Self> {
        config.check()?;
        schedule.check()?;

        Ok(Self {
            sync_interval: config.sync_interval,
            warmup_period: config.warmup_period,
            solve_mean_reward: config.solve_mean_reward,
            mean_reward_window: config.mean_reward_window,
            record_agent_info_interval: config.record_agent_info_interval,
            max_env_steps: config.max_env_steps,
            model_dir: config.model_dir,
            run_name: config.run_name,
            schedule,
            phase: TrainPhase::Warmup,
            env_steps: 0,
            episodes: 0,
            episode_rewards: VecDeque::new(),
            best_mean_reward: None,
        })
    }

    /// The current phase of the loop.
    pub fn phase(&self) -> TrainPhase {
        self.phase
    }

    /// The global environment-step counter.
    pub fn env_steps(&self) -> usize {
        self.env_steps
    }

    fn mean_reward(&self) -> f32 {
        self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32
    }

    fn save_best_params<E, R, A>(&self, agent: &A, mean_reward: f32)
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
    {
        let model_dir = match &self.model_dir {
            Some(model_dir) => model_dir,
            None => return,
        };
        let path = Path::new(model_dir).join(format!(
            "{}-best_{:.0}.pt",
            self.run_name, mean_reward
        ));
        match agent.save_params(&path) {
            Ok(()) => info!("Saved model parameters in {:?}", path),
            Err(_) => info!("Failed to save model parameters in {:?}", path),
        }
    }

    /// Runs the loop until convergence or until the step limit is hit.
    ///
    /// Any environment or backend fault terminates the loop with an error.
    pub fn train<E, A, R, O, AB>(
        &mut self,
        actor: &mut Actor<E>,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn Recorder,
    ) -> Result<()>
    where
        E: Env,
        O: BatchBase + From<E::Obs>,
        AB: BatchBase + From<E::Act>,
        R: ReplayBufferBase<Item = Transition<O, AB>>,
        A: Agent<E, R>,
    {
        let mut timer = Instant::now();
        let mut speed_marker = self.env_steps;

        loop {
            self.env_steps += 1;
            let epsilon = self.schedule.eps(self.env_steps);

            if let Some(episode_return) = actor.step(agent, buffer, epsilon)? {
                self.episodes += 1;
                self.episode_rewards.push_back(episode_return);
                if self.episode_rewards.len() > self.mean_reward_window {
                    self.episode_rewards.pop_front();
                }
                let mean_reward = self.mean_reward();

                let elapsed = timer.elapsed().as_secs_f32();
                let fps = if elapsed > 0.0 {
                    (self.env_steps - speed_marker) as f32 / elapsed
                } else {
                    0.0
                };
                speed_marker = self.env_steps;
                timer = Instant::now();

                info!(
                    "{}: done {} episodes, mean reward {:.3}, eps {:.2}, speed {:.2} f/s",
                    self.env_steps, self.episodes, mean_reward, epsilon, fps
                );
                recorder.write(
                    self.env_steps,
                    Record::from_slice(&[
                        ("epsilon", Scalar(epsilon as f32)),
                        ("fps", Scalar(fps)),
                        ("reward", Scalar(episode_return)),
                        ("reward_100", Scalar(mean_reward)),
                    ]),
                );

                if self.best_mean_reward.map_or(true, |best| mean_reward > best) {
                    self.save_best_params::<E, R, A>(agent, mean_reward);
                    if let Some(best) = self.best_mean_reward {
                        info!("Best mean reward updated {:.3} -> {:.3}", best, mean_reward);
                    }
                    self.best_mean_reward = Some(mean_reward);
                }

                if mean_reward > self.solve_mean_reward {
                    self.phase = TrainPhase::Converged;
                    info!("Solved in {} frames", self.env_steps);
                    recorder.flush();
                    return Ok(());
                }
            }

            if buffer.len() >= self.warmup_period {
                if self.phase == TrainPhase::Warmup {
                    self.phase = TrainPhase::Training;
                    info!(
                        "Warm-up finished after {} steps, optimization starts",
                        self.env_steps
                    );
                }

                if self.env_steps % self.sync_interval == 0 {
                    agent.sync()?;
                }

                let record = agent.opt(buffer)?;
                if self.env_steps % self.record_agent_info_interval == 0 {
                    recorder.write(self.env_steps, record);
                }
            }

            if self.max_env_steps > 0 && self.env_steps >= self.max_env_steps {
                recorder.flush();
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NullRecorder;
    use crate::replay_buffer::{ReplayBuffer, ReplayBufferConfig};
    use crate::testing::{CountingAgent, F32Batch, I64Batch, StubEnv, StubEnvConfig};

    type Buffer = ReplayBuffer<F32Batch, I64Batch>;

    fn fixture(
        episode_len: usize,
        capacity: usize,
        config: TrainerConfig,
    ) -> (Trainer, Actor<StubEnv>, Buffer) {
        let env_config = StubEnvConfig {
            episode_len,
            reward: 1.0,
        };
        let env = StubEnv::build(&env_config, 0).unwrap();
        let buffer = Buffer::build(&ReplayBufferConfig::default().capacity(capacity)).unwrap();
        let trainer = Trainer::build(config, EpsilonSchedule::default()).unwrap();
        (trainer, Actor::new(env), buffer)
    }

    #[test]
    fn build_rejects_invalid_configs() {
        assert!(Trainer::build(
            TrainerConfig::default().sync_interval(0),
            EpsilonSchedule::default()
        )
        .is_err());
        assert!(Trainer::build(
            TrainerConfig::default(),
            EpsilonSchedule {
                decay_last_step: 0,
                ..Default::default()
            }
        )
        .is_err());
    }

    #[test]
    fn warmup_gates_optimization() {
        // Capacity 100, warm-up 20, batch size 8: the first optimization
        // happens at step 20 and sampling must succeed from then on.
        let config = TrainerConfig::default()
            .warmup_period(20)
            .solve_mean_reward(1_000.0)
            .max_env_steps(25);
        let (mut trainer, mut actor, mut buffer) = fixture(5, 100, config);
        let mut agent = CountingAgent::new(8);

        trainer
            .train(&mut actor, &mut agent, &mut buffer, &mut NullRecorder {})
            .unwrap();

        assert_eq!(agent.n_opts, 6); // steps 20..=25
        assert_eq!(trainer.phase(), TrainPhase::Training);
    }

    #[test]
    fn syncs_exactly_at_multiples_of_the_interval() {
        let config = TrainerConfig::default()
            .warmup_period(10)
            .solve_mean_reward(1_000.0)
            .max_env_steps(2_500);
        let (mut trainer, mut actor, mut buffer) = fixture(0, 4_096, config);
        let mut agent = CountingAgent::new(8);

        trainer
            .train(&mut actor, &mut agent, &mut buffer, &mut NullRecorder {})
            .unwrap();

        // Multiples of 1000 within 2500 steps: 1000 and 2000.
        assert_eq!(agent.n_syncs, 2);
    }

    #[test]
    fn warmup_suppresses_syncs() {
        let config = TrainerConfig::default()
            .warmup_period(1_500)
            .solve_mean_reward(1_000.0)
            .max_env_steps(2_500);
        let (mut trainer, mut actor, mut buffer) = fixture(0, 4_096, config);
        let mut agent = CountingAgent::new(8);

        trainer
            .train(&mut actor, &mut agent, &mut buffer, &mut NullRecorder {})
            .unwrap();

        // Step 1000 falls into the warm-up period, only step 2000 syncs.
        assert_eq!(agent.n_syncs, 1);
    }

    #[test]
    fn no_sync_before_the_first_interval() {
        let config = TrainerConfig::default()
            .warmup_period(10)
            .solve_mean_reward(1_000.0)
            .max_env_steps(999);
        let (mut trainer, mut actor, mut buffer) = fixture(0, 4_096, config);
        let mut agent = CountingAgent::new(8);

        trainer
            .train(&mut actor, &mut agent, &mut buffer, &mut NullRecorder {})
            .unwrap();

        assert_eq!(agent.n_syncs, 0);
        assert!(agent.n_opts > 0);
    }

    #[test]
    fn converges_when_mean_reward_crosses_threshold() {
        // Episodes of 5 steps with reward 1.0 per step yield returns of
        // 5.0; the threshold is crossed with the first completed episode.
        let config = TrainerConfig::default()
            .warmup_period(20)
            .solve_mean_reward(4.0);
        let (mut trainer, mut actor, mut buffer) = fixture(5, 100, config);
        let mut agent = CountingAgent::new(8);

        trainer
            .train(&mut actor, &mut agent, &mut buffer, &mut NullRecorder {})
            .unwrap();

        assert_eq!(trainer.phase(), TrainPhase::Converged);
        assert_eq!(trainer.env_steps(), 5);
        assert_eq!(agent.n_opts, 0);
    }

    #[test]
    fn saves_snapshot_only_on_improvement() {
        let config = TrainerConfig::default()
            .warmup_period(20)
            .solve_mean_reward(1_000.0)
            .max_env_steps(12)
            .model_dir("unused-by-counting-agent");
        let (mut trainer, mut actor, mut buffer) = fixture(5, 100, config);
        let mut agent = CountingAgent::new(8);

        trainer
            .train(&mut actor, &mut agent, &mut buffer, &mut NullRecorder {})
            .unwrap();

        // Two episodes complete with equal returns; only the first one
        // improves the best mean.
        assert_eq!(agent.n_saves.get(), 1);
    }
}
