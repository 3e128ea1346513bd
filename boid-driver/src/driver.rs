use std::ops::ControlFlow;

use anyhow::{Context, Result};
use boid_core::{BoidConfig, StandardFlock, Vector2D};
use boid_shared::{BoidState, ControlCommand, FrameSnapshot, ObstacleState, Position, Velocity};
use rand::{rngs::StdRng, SeedableRng};

/// Owns the flock and the random source used to build and reset it.
pub struct Driver {
    flock: StandardFlock,
    rng: StdRng,
    frame: u64,
    steps: u64,
}

impl Driver {
    pub fn new(config: BoidConfig, seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => {
                log::info!("Seeding simulation with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let flock = StandardFlock::new(config, &mut rng).context("Invalid simulation settings")?;
        log::info!(
            "Created flock of {} boids with {} obstacles",
            flock.len(),
            flock.obstacles().len()
        );

        Ok(Self {
            flock,
            rng,
            frame: 0,
            steps: 0,
        })
    }

    pub fn flock(&self) -> &StandardFlock {
        &self.flock
    }

    /// Frames produced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames in which the flock actually advanced.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn apply(&mut self, command: ControlCommand) -> ControlFlow<()> {
        log::info!("Command: {:?}", command);
        match command {
            ControlCommand::Start => self.flock.start(),
            ControlCommand::Stop => self.flock.stop(),
            ControlCommand::Reset => self.flock.reset(&mut self.rng),
            ControlCommand::Exit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Runs one frame: ticks the flock if it is running and returns what the
    /// frame shows.
    pub fn advance(&mut self) -> FrameSnapshot {
        if self.flock.tick() {
            self.steps += 1;
        }
        self.frame += 1;
        self.snapshot()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            running: self.flock.is_running(),
            boids: self
                .flock
                .boids()
                .iter()
                .map(|boid| BoidState {
                    position: position(boid.position),
                    velocity: Velocity::new(boid.velocity.x, boid.velocity.y),
                    heading: heading(boid.velocity),
                })
                .collect(),
            obstacles: self
                .flock
                .obstacles()
                .iter()
                .map(|obstacle| ObstacleState {
                    position: position(obstacle.position),
                    radius: obstacle.radius,
                })
                .collect(),
        }
    }
}

fn position(v: Vector2D) -> Position {
    Position::new(v.x, v.y)
}

// A stationary boid keeps facing along +x.
fn heading(velocity: Vector2D) -> f32 {
    if velocity.is_zero() {
        0.0
    } else {
        velocity.heading_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        assert_eq!(heading(Vector2D::zero()), 0.0);
        assert!((heading(Vector2D::new(0.0, 2.0)) - 90.0).abs() < 1e-4);
        assert!((heading(Vector2D::new(-1.0, 0.0)) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_snapshot_mirrors_flock() {
        let driver = Driver::new(BoidConfig::default(), Some(1)).unwrap();
        let snapshot = driver.snapshot();

        assert_eq!(snapshot.frame, 0);
        assert!(!snapshot.running);
        assert_eq!(snapshot.boids.len(), 20);
        assert_eq!(snapshot.obstacles.len(), 10);
        let first = driver.flock().boids()[0];
        assert_eq!(snapshot.boids[0].position, position(first.position));
    }
}
