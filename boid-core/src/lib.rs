#![cfg_attr(not(feature = "std"), no_std)]

use core::f32::consts::TAU;

use rand::Rng;

pub mod behavior;
mod config;
pub mod flock;
mod math;
pub mod neighborhood;

pub use config::*;
pub use flock::{Flock, StandardFlock};
pub use neighborhood::Neighborhood;

/// A 2D vector used for position and velocity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.x * self.x + self.y * self.y)
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Same direction with magnitude `length`. A zero vector has no direction
    /// and is returned unchanged.
    pub fn scale_to_length(&self, length: f32) -> Self {
        self.normalize() * length
    }

    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max {
            self.scale_to_length(max)
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        math::sqrt(dx * dx + dy * dy)
    }

    /// Counter-clockwise rotation by `radians`.
    pub fn rotate(&self, radians: f32) -> Self {
        let (sin, cos) = math::sin_cos(radians);
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn rotate_degrees(&self, degrees: f32) -> Self {
        self.rotate(degrees.to_radians())
    }

    /// Angle of the vector in degrees, measured from the positive x axis.
    pub fn heading_degrees(&self) -> f32 {
        math::atan2(self.y, self.x).to_degrees()
    }

    /// Wraps each component into `[0, width) x [0, height)`.
    pub fn wrapped(&self, width: f32, height: f32) -> Self {
        Self {
            x: wrap(self.x, width),
            y: wrap(self.y, height),
        }
    }
}

fn wrap(value: f32, bound: f32) -> f32 {
    let mut wrapped = value % bound;
    if wrapped < 0.0 {
        wrapped += bound;
    }
    // A tiny negative remainder plus `bound` can round up to `bound` itself.
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl core::ops::DivAssign<f32> for Vector2D {
    fn div_assign(&mut self, scalar: f32) {
        self.x /= scalar;
        self.y /= scalar;
    }
}

/// A single boid entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Sum of the steering contributions of the last update.
    pub acceleration: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
        }
    }

    /// A boid at a uniform position inside the plane, moving at unit speed
    /// in a uniform direction.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &BoidConfig) -> Self {
        let mut boid = Self::new(Vector2D::zero(), Vector2D::zero());
        boid.randomize(rng, config);
        boid
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &BoidConfig) {
        self.position = Vector2D::new(
            rng.gen_range(0.0..config.width),
            rng.gen_range(0.0..config.height),
        );
        self.velocity = Vector2D::new(1.0, 0.0).rotate(rng.gen_range(0.0..TAU));
        self.acceleration = Vector2D::zero();
    }

    /// Advances the boid by one tick.
    ///
    /// `others` must not contain this boid. Alignment, cohesion and separation
    /// each walk their own copy of the iterator, so all four rules see the
    /// same neighbourhood.
    pub fn update<'a, I>(&mut self, others: I, obstacles: &[Obstacle], config: &BoidConfig)
    where
        I: IntoIterator<Item = &'a Boid>,
        I::IntoIter: Clone,
    {
        let others = others.into_iter();

        let alignment = behavior::alignment(self, others.clone(), config);
        let cohesion = behavior::cohesion(self, others.clone(), config);
        let separation = behavior::separation(self, others, config);
        let avoidance = behavior::avoid_obstacles(self, obstacles, config);

        self.acceleration = Vector2D::zero();
        self.acceleration += alignment;
        self.acceleration += cohesion;
        self.acceleration += separation;
        self.acceleration += avoidance;

        self.integrate(config);
    }

    fn integrate(&mut self, config: &BoidConfig) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(config.max_speed);
        self.position += self.velocity;
        self.position = self.position.wrapped(config.width, config.height);
    }
}

/// A circular region boids steer away from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vector2D,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(position: Vector2D, radius: f32) -> Self {
        Self { position, radius }
    }

    /// An obstacle with [`DEFAULT_OBSTACLE_RADIUS`].
    pub fn at(position: Vector2D) -> Self {
        Self::new(position, DEFAULT_OBSTACLE_RADIUS)
    }

    /// A scene obstacle kept [`OBSTACLE_INSET`] away from every edge.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &BoidConfig) -> Self {
        let x = inset_coordinate(rng, config.width);
        let y = inset_coordinate(rng, config.height);
        Self::new(Vector2D::new(x, y), config.obstacle_radius)
    }
}

fn inset_coordinate<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent > 2.0 * OBSTACLE_INSET {
        rng.gen_range(OBSTACLE_INSET..=extent - OBSTACLE_INSET)
    } else {
        extent / 2.0
    }
}
