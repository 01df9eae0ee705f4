//! Steering rules evaluated against a snapshot of the whole flock.
//!
//! Every rule identifies the steering boid by its index into `boids` and
//! skips that index when scanning for neighbours. The scans are brute force.

use crate::boid::Boid;
use crate::config::Weights;
use crate::vector::{angle_difference, Vector2D};

/// A behaviour that turns a boid's view of its flock into a force.
pub trait SteeringRule {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D;
}

/// Other boids strictly closer than `radius` to `boids[index]`, with their
/// distance.
pub fn neighbors(
    index: usize,
    boids: &[Boid],
    radius: f32,
) -> impl Iterator<Item = (&Boid, f32)> + '_ {
    let position = boids[index].position;
    boids
        .iter()
        .enumerate()
        .filter(move |(other, _)| *other != index)
        .map(move |(_, boid)| (boid, position.distance(&boid.position)))
        .filter(move |(_, distance)| *distance < radius)
}

/// Inverse-distance weighted push away from crowding neighbours.
///
/// Neighbours sitting exactly on top of the boid give no direction and are
/// ignored.
pub fn separation(index: usize, boids: &[Boid]) -> Vector2D {
    let boid = &boids[index];
    let mut steering = Vector2D::zero();
    let mut count = 0;

    for (other, distance) in neighbors(index, boids, boid.separation_distance) {
        if distance > 0.0 {
            steering += (boid.position - other.position).normalize() / distance;
            count += 1;
        }
    }

    if count > 0 {
        steering = steering / count as f32;
    }

    boid.steer_towards(steering)
}

/// Steer towards the average heading of neighbours in view.
pub fn alignment(index: usize, boids: &[Boid]) -> Vector2D {
    let boid = &boids[index];
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for (other, _) in neighbors(index, boids, boid.view_radius) {
        sum += other.velocity;
        count += 1;
    }

    if count > 0 {
        boid.steer_towards(sum / count as f32)
    } else {
        Vector2D::zero()
    }
}

/// Seek the centre of mass of neighbours in view.
pub fn cohesion(index: usize, boids: &[Boid]) -> Vector2D {
    let boid = &boids[index];
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for (other, _) in neighbors(index, boids, boid.view_radius) {
        sum += other.position;
        count += 1;
    }

    if count > 0 {
        boid.seek(sum / count as f32)
    } else {
        Vector2D::zero()
    }
}

/// The three classic rules, weighted and summed.
pub fn flocking(index: usize, boids: &[Boid], weights: &Weights) -> Vector2D {
    separation(index, boids) * weights.separation
        + alignment(index, boids) * weights.alignment
        + cohesion(index, boids) * weights.cohesion
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Separation;

impl SteeringRule for Separation {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D {
        separation(index, boids)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Alignment;

impl SteeringRule for Alignment {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D {
        alignment(index, boids)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Cohesion;

impl SteeringRule for Cohesion {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D {
        cohesion(index, boids)
    }
}

/// Pull towards a fixed point, independent of neighbours.
#[derive(Debug, Clone, Copy)]
pub struct Seek {
    pub target: Vector2D,
}

impl SteeringRule for Seek {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D {
        boids[index].seek(self.target)
    }
}

/// Rotates the velocity towards `heading`, at most `max_turn` radians.
///
/// The turn is returned as a force so it composes with vector rules. A
/// stationary boid has no heading to turn.
fn turn_towards(boid: &Boid, heading: f32, max_turn: f32) -> Vector2D {
    if boid.velocity.magnitude_squared() == 0.0 {
        return Vector2D::zero();
    }
    let delta = angle_difference(heading, boid.heading()).clamp(-max_turn, max_turn);
    boid.velocity.rotate(delta) - boid.velocity
}

/// Heading-based alignment: turn towards the circular mean of neighbour
/// headings.
#[derive(Debug, Clone, Copy)]
pub struct TurnAlignment {
    pub max_turn: f32,
}

impl SteeringRule for TurnAlignment {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D {
        let boid = &boids[index];
        let mut sum = Vector2D::zero();
        for (other, _) in neighbors(index, boids, boid.view_radius) {
            sum += other.velocity.normalize();
        }
        if sum.magnitude_squared() == 0.0 {
            return Vector2D::zero();
        }
        turn_towards(boid, sum.heading(), self.max_turn)
    }
}

/// Heading-based cohesion: turn to face the neighbours' centre of mass.
#[derive(Debug, Clone, Copy)]
pub struct TurnCohesion {
    pub max_turn: f32,
}

impl SteeringRule for TurnCohesion {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D {
        let boid = &boids[index];
        let mut sum = Vector2D::zero();
        let mut count = 0;
        for (other, _) in neighbors(index, boids, boid.view_radius) {
            sum += other.position;
            count += 1;
        }
        if count == 0 {
            return Vector2D::zero();
        }
        let offset = sum / count as f32 - boid.position;
        if offset.magnitude_squared() == 0.0 {
            return Vector2D::zero();
        }
        turn_towards(boid, offset.heading(), self.max_turn)
    }
}

/// Heading-based separation: turn away from crowding neighbours.
#[derive(Debug, Clone, Copy)]
pub struct TurnSeparation {
    pub max_turn: f32,
}

impl SteeringRule for TurnSeparation {
    fn steer(&self, index: usize, boids: &[Boid]) -> Vector2D {
        let boid = &boids[index];
        let mut away = Vector2D::zero();
        for (other, distance) in neighbors(index, boids, boid.separation_distance) {
            if distance > 0.0 {
                away += (boid.position - other.position).normalize() / distance;
            }
        }
        if away.magnitude_squared() == 0.0 {
            return Vector2D::zero();
        }
        turn_towards(boid, away.heading(), self.max_turn)
    }
}
