#![cfg_attr(not(feature = "std"), no_std)]

//! Boids flocking on a wrapping 2D plane.
//!
//! The host owns the clock, the rule weights and the optional target point
//! and calls [`Flock::tick`] once per frame; everything in here is
//! single-threaded and allocation happens only for the per-tick force
//! buffer.

extern crate alloc;

mod math;

pub mod boid;
pub mod config;
pub mod flock;
pub mod rules;
pub mod vector;

pub use boid::Boid;
pub use config::{BoidConfig, Weights};
pub use flock::Flock;
pub use rules::{
    Alignment, Cohesion, Separation, Seek, SteeringRule, TurnAlignment, TurnCohesion,
    TurnSeparation,
};
pub use vector::{wrap, Vector2D};
