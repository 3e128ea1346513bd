use core::fmt;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const NUM_BOIDS: usize = 20;
pub const NUM_OBSTACLES: usize = 10;
pub const MAX_SPEED: f32 = 3.0;
pub const MAX_FORCE: f32 = 0.05;
pub const PERCEPTION: f32 = 50.0;
pub const SEPARATION: f32 = 20.0;

/// Extra clearance around an obstacle's radius inside which avoidance kicks in.
pub const OBSTACLE_MARGIN: f32 = 10.0;
/// Radius of the obstacles scattered by [`crate::Obstacle::random`].
pub const SCENE_OBSTACLE_RADIUS: f32 = 15.0;
/// Radius used by [`crate::Obstacle::at`].
pub const DEFAULT_OBSTACLE_RADIUS: f32 = 30.0;
/// Minimum distance between a scene obstacle's centre and the plane's edges.
pub const OBSTACLE_INSET: f32 = 50.0;

/// Configuration for the boid simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidConfig {
    pub width: f32,
    pub height: f32,
    pub num_boids: usize,
    pub num_obstacles: usize,
    pub max_speed: f32,
    pub max_force: f32,
    /// Neighbour radius for alignment and cohesion.
    pub perception: f32,
    /// Neighbour radius for separation.
    pub separation: f32,
    pub obstacle_margin: f32,
    pub obstacle_radius: f32,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            num_boids: NUM_BOIDS,
            num_obstacles: NUM_OBSTACLES,
            max_speed: MAX_SPEED,
            max_force: MAX_FORCE,
            perception: PERCEPTION,
            separation: SEPARATION,
            obstacle_margin: OBSTACLE_MARGIN,
            obstacle_radius: SCENE_OBSTACLE_RADIUS,
        }
    }
}

impl BoidConfig {
    /// Force ceiling for obstacle avoidance, twice that of the flocking rules.
    pub fn avoidance_force(&self) -> f32 {
        2.0 * self.max_force
    }

    /// Widest radius any steering rule looks at.
    pub fn query_radius(&self) -> f32 {
        self.perception.max(self.separation)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ConfigError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }

        let parameters = [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("perception", self.perception),
            ("separation", self.separation),
            ("obstacle_margin", self.obstacle_margin),
            ("obstacle_radius", self.obstacle_radius),
        ];
        for (name, value) in parameters {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidBounds {
        width: f32,
        height: f32,
    },
    InvalidParameter {
        name: &'static str,
        value: f32,
    },
    CapacityExceeded {
        what: &'static str,
        requested: usize,
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBounds { width, height } => {
                write!(f, "plane must have positive finite bounds, got {width}x{height}")
            }
            ConfigError::InvalidParameter { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            ConfigError::CapacityExceeded {
                what,
                requested,
                capacity,
            } => write!(f, "requested {requested} {what} but the flock holds at most {capacity}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
