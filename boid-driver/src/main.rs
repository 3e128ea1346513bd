use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_driver::{boid_config, load_settings, run, spawn_command_reader, Driver, RunOptions};
use boid_shared::ControlCommand;
use clap::Parser;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flocking simulation", long_about = None)]
struct Args {
    /// JSON settings file; defaults are used for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for boid and obstacle placement (overrides the settings file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Stop after this many frames
    #[arg(short, long)]
    frames: Option<u64>,

    /// Start the flock immediately instead of waiting for a `start` command
    #[arg(short, long)]
    autostart: bool,

    /// Write every frame to stdout as a JSON line
    #[arg(short, long)]
    emit_frames: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid driver starting...");

    let settings = load_settings(args.config.as_deref())?;
    let seed = args.seed.or(settings.seed);
    let mut driver = Driver::new(boid_config(&settings), seed)
        .context("Failed to initialize simulation")?;

    let (tx, rx) = mpsc::channel(16);
    if args.autostart {
        tx.send(ControlCommand::Start).await?;
    }
    spawn_command_reader(tokio::io::stdin(), tx.clone());

    let interrupt = tx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt.send(ControlCommand::Exit).await;
        }
    });

    log::info!("Commands on stdin: start, stop, reset, exit");
    let options = RunOptions {
        fps: args.fps,
        max_frames: args.frames,
    };
    let sink = args.emit_frames.then(std::io::stdout);

    let summary = run(&mut driver, rx, sink, &options)
        .await
        .context("Simulation error")?;

    log::info!(
        "Finished after {} frames ({} steps)",
        summary.frames,
        summary.steps
    );
    Ok(())
}
