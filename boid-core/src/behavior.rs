//! Steering rules. Each returns a bounded contribution to a boid's
//! acceleration, or the zero vector when the rule has nothing to react to.

use crate::{Boid, BoidConfig, Obstacle, Vector2D};

/// Steer towards the average heading of neighbours within `perception`.
pub fn alignment<'a, I>(boid: &Boid, others: I, config: &BoidConfig) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if boid.position.distance(&other.position) < config.perception {
            sum += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    sum /= count as f32;
    steer(boid, sum, config.max_speed, config.max_force)
}

/// Steer towards the centroid of neighbours within `perception`.
pub fn cohesion<'a, I>(boid: &Boid, others: I, config: &BoidConfig) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if boid.position.distance(&other.position) < config.perception {
            sum += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    sum /= count as f32;
    steer(boid, sum - boid.position, config.max_speed, config.max_force)
}

/// Steer away from neighbours closer than `separation`, weighting each by the
/// inverse of its distance. Neighbours sharing the boid's exact position give
/// no direction and are ignored.
pub fn separation<'a, I>(boid: &Boid, others: I, config: &BoidConfig) -> Vector2D
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut steering = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = boid.position.distance(&other.position);
        if distance > 0.0 && distance < config.separation {
            steering += (boid.position - other.position) / distance;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    steering /= count as f32;
    steer(boid, steering, config.max_speed, config.max_force)
}

/// Steer away from every obstacle whose margin the boid has entered. Limited
/// to [`BoidConfig::avoidance_force`] so it outweighs the flocking rules.
pub fn avoid_obstacles<'a, I>(boid: &Boid, obstacles: I, config: &BoidConfig) -> Vector2D
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    let mut steering = Vector2D::zero();

    for obstacle in obstacles {
        let distance = boid.position.distance(&obstacle.position);
        if distance < obstacle.radius + config.obstacle_margin {
            let away = boid.position - obstacle.position;
            if away.magnitude() > 0.0 {
                steering += away.normalize() / distance;
            }
        }
    }

    steer(boid, steering, config.max_speed, config.avoidance_force())
}

/// Reynolds steering: desired velocity along `direction` at full speed, minus
/// the current velocity, limited to `max_force`.
fn steer(boid: &Boid, direction: Vector2D, max_speed: f32, max_force: f32) -> Vector2D {
    let desired = direction.scale_to_length(max_speed);
    if desired.is_zero() {
        return Vector2D::zero();
    }
    (desired - boid.velocity).limit(max_force)
}
