mod args;
mod context;
mod engine;
mod games;
mod progress;
mod replay;

use args::Args;
use candle_core::Device;
use clap::Parser;
use context::TrainingContext;
use engine::EngineProcess;
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let games = games::load(&args.games)?;
    if games.is_empty() {
        return Err(format!("no games found in {}", args.games.display()).into());
    }
    log::info!("Loaded {} games from {}", games.len(), args.games.display());

    let device = Device::cuda_if_available(0)?;
    if device.is_cuda() {
        log::info!("Using CUDA");
    } else {
        log::info!("Using CPU");
    }

    // If anything below fails, dropping the engine releases its process.
    let mut engine = EngineProcess::start(&args.engine)?;
    log::info!("Engine ready: {}", args.engine.display());

    let mut ctx = TrainingContext::new(&device, args.learning_rate, args.depth)?;

    log::info!("Training for {} epochs at depth {}", args.epochs, args.depth);
    ctx.train(&games, &mut engine, args.epochs)?;

    engine.quit()?;

    log::info!("Saving model to {}", args.output.display());
    ctx.save(&args.output)?;

    log::info!("Done!");
    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    Ok(args)
}
