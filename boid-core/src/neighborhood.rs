//! Neighbour queries used to feed the steering rules.
//!
//! The flock only asks for "the other boids within this radius"; how that
//! question is answered is up to the implementor. The slice implementation
//! below is a plain linear scan.

use crate::Boid;

pub trait Neighborhood {
    /// Boids other than the one at `index` lying strictly closer than `radius`
    /// to it, in storage order.
    fn neighbors_within<'a>(
        &'a self,
        index: usize,
        radius: f32,
    ) -> impl Iterator<Item = &'a Boid> + Clone + 'a;
}

impl Neighborhood for [Boid] {
    fn neighbors_within<'a>(
        &'a self,
        index: usize,
        radius: f32,
    ) -> impl Iterator<Item = &'a Boid> + Clone + 'a {
        let origin = self.get(index).map(|boid| boid.position);

        self.iter()
            .enumerate()
            .filter_map(move |(other_index, other)| {
                let origin = origin?;
                let within = other_index != index && origin.distance(&other.position) < radius;
                within.then_some(other)
            })
    }
}
