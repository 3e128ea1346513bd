//! A fixed population of boids sharing one plane and one obstacle layout.

use rand::Rng;

use crate::{Boid, BoidConfig, ConfigError, Neighborhood, Obstacle};

/// Capacity of [`StandardFlock`].
pub const MAX_BOIDS: usize = 512;
pub const MAX_OBSTACLES: usize = 64;

pub type StandardFlock = Flock<MAX_BOIDS, MAX_OBSTACLES>;

/// A collection of boids stored inline, so it works without an allocator.
///
/// Boids are advanced one at a time in storage order and each update is
/// written back before the next boid runs, so within a tick later boids see
/// their already-moved neighbours.
#[derive(Debug, Clone)]
pub struct Flock<const N: usize, const M: usize> {
    boids: heapless::Vec<Boid, N>,
    obstacles: heapless::Vec<Obstacle, M>,
    config: BoidConfig,
    running: bool,
    ticks: u64,
}

impl<const N: usize, const M: usize> Flock<N, M> {
    /// `config.num_boids` random boids and `config.num_obstacles` scene
    /// obstacles. The flock starts paused.
    pub fn new<R: Rng + ?Sized>(config: BoidConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        check_capacity("obstacles", config.num_obstacles, M)?;
        let obstacles: heapless::Vec<Obstacle, M> = (0..config.num_obstacles)
            .map(|_| Obstacle::random(rng, &config))
            .collect();
        Self::with_obstacles(config, obstacles, rng)
    }

    /// `config.num_boids` random boids around a caller-chosen obstacle layout.
    pub fn with_obstacles<R, I>(config: BoidConfig, obstacles: I, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = Obstacle>,
    {
        config.validate()?;
        check_capacity("boids", config.num_boids, N)?;
        let boids = (0..config.num_boids).map(|_| Boid::random(rng, &config));
        Self::from_parts(config, boids, obstacles)
    }

    /// A flock made of exactly the given boids and obstacles. The population
    /// is whatever `boids` yields; `config.num_boids` is not consulted.
    pub fn from_parts<B, O>(config: BoidConfig, boids: B, obstacles: O) -> Result<Self, ConfigError>
    where
        B: IntoIterator<Item = Boid>,
        O: IntoIterator<Item = Obstacle>,
    {
        config.validate()?;

        let mut flock = Self {
            boids: heapless::Vec::new(),
            obstacles: heapless::Vec::new(),
            config,
            running: false,
            ticks: 0,
        };
        for boid in boids {
            flock
                .boids
                .push(boid)
                .map_err(|_| capacity_error("boids", N))?;
        }
        for obstacle in obstacles {
            flock
                .obstacles
                .push(obstacle)
                .map_err(|_| capacity_error("obstacles", M))?;
        }

        log::debug!(
            "flock ready: {} boids, {} obstacles on a {}x{} plane",
            flock.boids.len(),
            flock.obstacles.len(),
            config.width,
            config.height
        );
        Ok(flock)
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn config(&self) -> &BoidConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Number of steps taken since construction or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("flock started at tick {}", self.ticks);
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("flock stopped at tick {}", self.ticks);
        }
        self.running = false;
    }

    /// Steps the flock if it is running. Returns whether a step was taken.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.step();
        }
        self.running
    }

    /// Advances every boid once, regardless of the running flag.
    pub fn step(&mut self) {
        let radius = self.config.query_radius();

        for index in 0..self.boids.len() {
            let Some(mut boid) = self.boids.get(index).copied() else {
                continue;
            };
            boid.update(
                self.boids.as_slice().neighbors_within(index, radius),
                &self.obstacles,
                &self.config,
            );
            if let Some(slot) = self.boids.get_mut(index) {
                *slot = boid;
            }
        }

        self.ticks += 1;
    }

    /// Scatters every boid again and pauses the flock. Population and
    /// obstacles are left as they are.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for boid in self.boids.iter_mut() {
            boid.randomize(rng, &self.config);
        }
        self.running = false;
        self.ticks = 0;
        log::debug!("flock reset: {} boids rescattered", self.boids.len());
    }
}

fn check_capacity(what: &'static str, requested: usize, capacity: usize) -> Result<(), ConfigError> {
    if requested > capacity {
        Err(ConfigError::CapacityExceeded {
            what,
            requested,
            capacity,
        })
    } else {
        Ok(())
    }
}

fn capacity_error(what: &'static str, capacity: usize) -> ConfigError {
    ConfigError::CapacityExceeded {
        what,
        requested: capacity + 1,
        capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector2D;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded_flock(seed: u64) -> StandardFlock {
        let mut rng = StdRng::seed_from_u64(seed);
        StandardFlock::new(BoidConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_flock_creation() {
        let flock = seeded_flock(1);
        assert_eq!(flock.len(), 20);
        assert_eq!(flock.obstacles().len(), 10);
        assert!(!flock.is_running());
        assert_eq!(flock.ticks(), 0);
        assert!(flock
            .obstacles()
            .iter()
            .all(|o| o.radius == crate::SCENE_OBSTACLE_RADIUS));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = BoidConfig {
            num_boids: 5,
            ..BoidConfig::default()
        };
        let result = Flock::<4, 16>::new(config, &mut rng);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::CapacityExceeded {
                what: "boids",
                requested: 5,
                capacity: 4
            }
        );

        let result = Flock::<32, 2>::new(BoidConfig::default(), &mut rng);
        assert!(matches!(
            result,
            Err(ConfigError::CapacityExceeded { what: "obstacles", .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = BoidConfig {
            width: -5.0,
            ..BoidConfig::default()
        };
        assert!(StandardFlock::new(config, &mut rng).is_err());
    }

    #[test]
    fn test_paused_tick_leaves_flock_untouched() {
        let mut flock = seeded_flock(2);
        let before = flock.boids().to_vec();

        assert!(!flock.tick());

        assert_eq!(flock.boids(), before.as_slice());
        assert_eq!(flock.ticks(), 0);
    }

    #[test]
    fn test_running_tick_moves_boids() {
        let mut flock = seeded_flock(2);
        let before = flock.boids().to_vec();

        flock.start();
        assert!(flock.tick());

        assert_eq!(flock.ticks(), 1);
        let changed = flock
            .boids()
            .iter()
            .zip(before.iter())
            .any(|(b, initial)| b.position != initial.position);
        assert!(changed);

        flock.stop();
        assert!(!flock.tick());
        assert_eq!(flock.ticks(), 1);
    }

    #[test]
    fn test_speed_and_bounds_hold_every_tick() {
        let mut flock = seeded_flock(3);
        let config = *flock.config();

        for _ in 0..600 {
            flock.step();
            for boid in flock.boids() {
                assert!(boid.velocity.magnitude() <= config.max_speed + 1e-4);
                assert!(boid.position.x >= 0.0 && boid.position.x < config.width);
                assert!(boid.position.y >= 0.0 && boid.position.y < config.height);
            }
        }
    }

    #[test]
    fn test_later_boids_see_earlier_updates() {
        let config = BoidConfig::default();
        let first = Boid::new(Vector2D::new(100.0, 100.0), Vector2D::new(1.0, 0.0));
        let second = Boid::new(Vector2D::new(115.0, 100.0), Vector2D::new(0.0, 1.0));
        let mut flock = Flock::<4, 4>::from_parts(config, [first, second], None).unwrap();

        let mut expected_first = first;
        expected_first.update([&second], &[], &config);
        let mut expected_second = second;
        expected_second.update([&expected_first], &[], &config);

        flock.step();

        assert_eq!(flock.boids(), &[expected_first, expected_second]);
    }

    #[test]
    fn test_same_seed_gives_same_trajectory() {
        let mut a = seeded_flock(42);
        let mut b = seeded_flock(42);

        for _ in 0..200 {
            a.step();
            b.step();
        }

        assert_eq!(a.boids(), b.boids());
        assert_eq!(a.obstacles(), b.obstacles());
    }

    #[test]
    fn test_reset_rescatters_and_pauses() {
        let mut flock = seeded_flock(5);
        let obstacles = flock.obstacles().to_vec();
        let config = *flock.config();
        flock.start();
        for _ in 0..30 {
            flock.tick();
        }

        let mut rng = StdRng::seed_from_u64(99);
        flock.reset(&mut rng);

        assert!(!flock.is_running());
        assert_eq!(flock.ticks(), 0);
        assert_eq!(flock.len(), config.num_boids);
        assert_eq!(flock.obstacles(), obstacles.as_slice());
        for boid in flock.boids() {
            assert_abs_diff_eq!(boid.velocity.magnitude(), 1.0, epsilon = 1e-5);
            assert!(boid.position.x >= 0.0 && boid.position.x < config.width);
            assert!(boid.position.y >= 0.0 && boid.position.y < config.height);
            assert!(boid.acceleration.is_zero());
        }
    }

    #[test]
    fn test_with_obstacles_keeps_layout() {
        let mut rng = StdRng::seed_from_u64(8);
        let layout = [Obstacle::at(Vector2D::new(400.0, 300.0))];
        let flock = StandardFlock::with_obstacles(BoidConfig::default(), layout, &mut rng).unwrap();

        assert_eq!(flock.obstacles(), &layout);
        assert_eq!(flock.len(), 20);
    }
}
