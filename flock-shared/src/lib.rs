#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A point on the simulation plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Multipliers for the three flocking rules and the target pull
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleWeights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    pub attraction: f32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            separation: 1.0,
            alignment: 1.0,
            cohesion: 1.0,
            attraction: 1.0,
        }
    }
}

/// Simulation settings as read from a settings file.
///
/// Missing fields take their defaults, so `{}` is a valid file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoidSettings {
    pub weights: RuleWeights,
    pub view_radius: f32,
    pub separation_distance: f32,
    pub max_speed: f32,
    pub max_steer_force: f32,
    /// Attraction point, if any
    pub target: Option<Position>,
}

impl Default for BoidSettings {
    fn default() -> Self {
        Self {
            weights: RuleWeights::default(),
            view_radius: 200.0,
            separation_distance: 100.0,
            max_speed: 3.0,
            max_steer_force: 0.05,
            target: None,
        }
    }
}

/// Update message that moves or clears the attraction point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetUpdate {
    /// `None` means no target, free flying
    pub position: Option<Position>,
}

/// What a renderer needs to draw one boid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidState {
    pub position: Position,
    /// Radians, `atan2` of the velocity
    pub heading: f32,
}

/// Every boid after a given tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub width: f32,
    pub height: f32,
    pub boids: Vec<BoidState>,
}

/// Summary of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub boid_count: usize,
    pub ticks: u64,
    pub target_active: bool,
}
