mod args;
mod config;
mod types;
use anyhow::Result;
use args::Args;
use clap::Parser;
use config::DqnPongConfig;
use types::*;
use volley_core::{replay_buffer::ReplayBufferBase as _, Configurable as _, Env as _, Trainer};
use volley_tensorboard::TensorboardRecorder;

fn train(config: &DqnPongConfig) -> Result<()> {
    let env = Env::build(&config.env_config(), 0)?;
    let mut actor = Actor::new(env);
    let n_actions = actor.n_actions() as i64;

    let mut agent = Dqn::build(config.agent_config(n_actions))?;
    let mut buffer = Buffer::build(&config.replay_buffer_config())?;
    let mut recorder = TensorboardRecorder::new(config.model_dir());
    let mut trainer = Trainer::build(config.trainer_config(), config.schedule())?;

    trainer.train(&mut actor, &mut agent, &mut buffer, &mut recorder)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let config: DqnPongConfig = Args::parse().into();
    train(&config)
}
