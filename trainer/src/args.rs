use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "Evaluator Trainer")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Path to the UCI engine executable used for scoring positions.
    #[arg(long)]
    pub engine: PathBuf,

    /// File with one game per line, moves in coordinate notation.
    #[arg(long)]
    pub games: PathBuf,

    /// Engine search depth per scored position.
    #[arg(long, default_value_t = 15)]
    pub depth: u8,

    /// Number of training epochs.
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Learning rate for the optimizer.
    #[arg(long, default_value_t = 0.001)]
    pub learning_rate: f64,

    /// Where the trained model is written.
    #[arg(long, default_value = "model.safetensors")]
    pub output: PathBuf,
}
