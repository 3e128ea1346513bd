use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use boid_shared::ControlCommand;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::Driver;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Target frame rate.
    pub fps: u32,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub steps: u64,
}

/// Drives the flock at the configured frame rate until an exit command
/// arrives or the frame limit is reached.
///
/// Pending commands are always applied before the next frame. Every frame is
/// written to `sink` as one JSON line, paused or not.
pub async fn run<W: Write>(
    driver: &mut Driver,
    mut commands: mpsc::Receiver<ControlCommand>,
    mut sink: Option<W>,
    options: &RunOptions,
) -> Result<RunSummary> {
    let period = Duration::from_secs_f64(1.0 / f64::from(options.fps.max(1)));
    let mut clock = time::interval(period);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut commands_open = true;
    let status_every = u64::from(options.fps.max(1));

    loop {
        if options.max_frames.is_some_and(|max| driver.frame() >= max) {
            log::info!("Reached frame limit");
            break;
        }

        tokio::select! {
            biased;

            command = commands.recv(), if commands_open => match command {
                Some(command) => {
                    if driver.apply(command).is_break() {
                        log::info!("Exit requested");
                        break;
                    }
                }
                None => {
                    log::debug!("Command channel closed");
                    commands_open = false;
                }
            },
            _ = clock.tick() => {
                let snapshot = driver.advance();
                if let Some(sink) = sink.as_mut() {
                    let line = snapshot.to_json().context("Failed to encode frame")?;
                    writeln!(sink, "{}", line).context("Failed to write frame")?;
                    sink.flush().context("Failed to write frame")?;
                }
                if snapshot.frame % status_every == 0 {
                    log::debug!(
                        "Frame {}: running={} steps={}",
                        snapshot.frame,
                        snapshot.running,
                        driver.steps()
                    );
                }
            }
        }
    }

    Ok(RunSummary {
        frames: driver.frame(),
        steps: driver.steps(),
    })
}

/// Forwards one command per non-empty line of `reader` until the input ends
/// or the receiving side goes away. Unrecognised lines are logged and skipped.
pub fn spawn_command_reader<R>(reader: R, commands: mpsc::Sender<ControlCommand>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<ControlCommand>() {
                        Ok(command) => {
                            if commands.send(command).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => log::warn!("{}", e),
                    }
                }
                Ok(None) => {
                    log::debug!("Command input closed");
                    break;
                }
                Err(e) => {
                    log::warn!("Failed to read command: {}", e);
                    break;
                }
            }
        }
    })
}
