/// Per-boid perception and motion limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidConfig {
    /// Neighbour distance for alignment and cohesion
    pub view_radius: f32,
    /// Neighbour distance for separation
    pub separation_distance: f32,
    pub max_speed: f32,
    /// Cap on any single steering contribution
    pub max_steer_force: f32,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            view_radius: 200.0,
            separation_distance: 100.0,
            max_speed: 3.0,
            max_steer_force: 0.05,
        }
    }
}

/// Rule weights supplied by the caller on every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    /// Multiplier for the pull towards an external target point
    pub attraction: f32,
}

impl Weights {
    pub fn new(separation: f32, alignment: f32, cohesion: f32) -> Self {
        Self {
            separation,
            alignment,
            cohesion,
            ..Self::default()
        }
    }

    pub fn with_attraction(mut self, attraction: f32) -> Self {
        self.attraction = attraction;
        self
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            separation: 1.0,
            alignment: 1.0,
            cohesion: 1.0,
            attraction: 1.0,
        }
    }
}
