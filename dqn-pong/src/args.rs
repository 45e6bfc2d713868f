use clap::Parser;

/// Train a DQN agent on an Atari environment.
#[derive(Clone, Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Enable cuda.
    #[arg(long)]
    pub cuda: bool,

    /// Name of the environment.
    #[arg(long, default_value = "ALE/Pong-v5")]
    pub env: String,
}
