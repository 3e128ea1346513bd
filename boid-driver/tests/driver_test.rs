use anyhow::Result;
use boid_core::BoidConfig;
use boid_driver::{run, spawn_command_reader, Driver, RunOptions, RunSummary};
use boid_shared::{ControlCommand, FrameSnapshot};
use tokio::sync::mpsc;
use tokio_test::assert_ok;

fn seeded_driver(seed: u64) -> Driver {
    Driver::new(BoidConfig::default(), Some(seed)).unwrap()
}

fn frames(output: &[u8]) -> Vec<FrameSnapshot> {
    std::str::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Runs `driver` for `max_frames` frames with `commands` queued up front.
async fn run_with(
    driver: &mut Driver,
    commands: &[ControlCommand],
    max_frames: u64,
) -> Result<(RunSummary, Vec<FrameSnapshot>)> {
    let (tx, rx) = mpsc::channel(16);
    for command in commands {
        tx.send(*command).await?;
    }
    drop(tx);

    let mut output: Vec<u8> = Vec::new();
    let options = RunOptions {
        fps: 60,
        max_frames: Some(max_frames),
    };
    let summary = run(driver, rx, Some(&mut output), &options).await?;
    Ok((summary, frames(&output)))
}

#[test]
fn test_commands_toggle_running() {
    let mut driver = seeded_driver(1);
    assert!(!driver.flock().is_running());

    assert!(driver.apply(ControlCommand::Start).is_continue());
    assert!(driver.flock().is_running());

    assert!(driver.apply(ControlCommand::Stop).is_continue());
    assert!(!driver.flock().is_running());

    assert!(driver.apply(ControlCommand::Exit).is_break());
}

#[test]
fn test_reset_keeps_population_and_pauses() {
    let mut driver = seeded_driver(2);
    let obstacles = driver.flock().obstacles().to_vec();
    assert!(driver.apply(ControlCommand::Start).is_continue());
    for _ in 0..10 {
        driver.advance();
    }

    assert!(driver.apply(ControlCommand::Reset).is_continue());

    assert!(!driver.flock().is_running());
    assert_eq!(driver.flock().len(), 20);
    assert_eq!(driver.flock().obstacles(), obstacles.as_slice());
    for boid in driver.flock().boids() {
        assert!((boid.velocity.magnitude() - 1.0).abs() < 1e-5);
    }
    // Frames keep counting across a reset.
    assert_eq!(driver.frame(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_run_emits_one_frame_per_tick() {
    let mut driver = seeded_driver(3);

    let (summary, snapshots) = assert_ok!(run_with(&mut driver, &[ControlCommand::Start], 5).await);

    assert_eq!(summary, RunSummary { frames: 5, steps: 5 });
    assert_eq!(snapshots.len(), 5);
    for (i, snapshot) in snapshots.iter().enumerate() {
        assert_eq!(snapshot.frame, i as u64 + 1);
        assert!(snapshot.running);
        assert_eq!(snapshot.boids.len(), 20);
        assert_eq!(snapshot.obstacles.len(), 10);
    }
    assert_ne!(snapshots[0].boids, snapshots[4].boids);
}

#[tokio::test(start_paused = true)]
async fn test_paused_frames_repeat_last_state() {
    let mut driver = seeded_driver(4);

    let (summary, snapshots) = assert_ok!(run_with(&mut driver, &[], 3).await);

    assert_eq!(summary, RunSummary { frames: 3, steps: 0 });
    assert_eq!(snapshots.len(), 3);
    assert!(snapshots.iter().all(|s| !s.running));
    assert_eq!(snapshots[0].boids, snapshots[2].boids);
}

#[tokio::test(start_paused = true)]
async fn test_exit_stops_before_frame_limit() {
    let mut driver = seeded_driver(5);

    let (summary, snapshots) = assert_ok!(
        run_with(&mut driver, &[ControlCommand::Start, ControlCommand::Exit], 100).await
    );

    assert_eq!(summary.frames, 0);
    assert!(snapshots.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_same_seed_same_frames() {
    let mut a = seeded_driver(42);
    let mut b = seeded_driver(42);

    let (_, first) = assert_ok!(run_with(&mut a, &[ControlCommand::Start], 30).await);
    let (_, second) = assert_ok!(run_with(&mut b, &[ControlCommand::Start], 30).await);

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_command_reader_skips_unknown_lines() {
    let input: &'static [u8] = b"start\n\njump\n{\"command\":\"reset\"}\nexit\n";
    let (tx, mut rx) = mpsc::channel(8);

    assert_ok!(spawn_command_reader(input, tx).await);

    let mut received = Vec::new();
    while let Some(command) = rx.recv().await {
        received.push(command);
    }
    assert_eq!(
        received,
        vec![
            ControlCommand::Start,
            ControlCommand::Reset,
            ControlCommand::Exit
        ]
    );
}

#[test]
fn test_invalid_config_fails_to_build() {
    let config = BoidConfig {
        num_boids: 10_000,
        ..BoidConfig::default()
    };
    let err = Driver::new(config, Some(1)).err().unwrap();
    assert!(format!("{:#}", err).contains("10000 boids"));
}
