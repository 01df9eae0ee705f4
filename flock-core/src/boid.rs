use crate::config::BoidConfig;
use crate::vector::{wrap, Vector2D};

#[cfg(feature = "std")]
use rand::Rng;

/// A single boid entity
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Force accumulated during the current tick, cleared by [`Boid::advance`]
    pub acceleration: Vector2D,
    pub view_radius: f32,
    pub separation_distance: f32,
    pub max_speed: f32,
    pub max_steer_force: f32,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self::with_config(position, velocity, &BoidConfig::default())
    }

    pub fn with_config(position: Vector2D, velocity: Vector2D, config: &BoidConfig) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
            view_radius: config.view_radius,
            separation_distance: config.separation_distance,
            max_speed: config.max_speed,
            max_steer_force: config.max_steer_force,
        }
    }

    /// A boid placed uniformly inside the plane, flying in a random
    /// direction at between half and full `max_speed`.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: f32,
        height: f32,
        config: &BoidConfig,
    ) -> Self {
        let position = Vector2D::new(sample(rng, width), sample(rng, height));
        let angle = rng.gen_range(0.0..core::f32::consts::TAU);
        let speed = config.max_speed * rng.gen_range(0.5..=1.0);
        Self::with_config(position, Vector2D::from_angle(angle) * speed, config)
    }

    /// Direction of travel in radians, for drawing.
    pub fn heading(&self) -> f32 {
        self.velocity.heading()
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    /// Steering force that turns the current velocity towards `direction`
    /// at full speed. A zero direction yields no force.
    pub fn steer_towards(&self, direction: Vector2D) -> Vector2D {
        if direction.magnitude_squared() == 0.0 {
            return Vector2D::zero();
        }
        let desired = direction.normalize() * self.max_speed;
        (desired - self.velocity).limit(self.max_steer_force)
    }

    /// Seek steering towards `point`; zero when already there.
    pub fn seek(&self, point: Vector2D) -> Vector2D {
        self.steer_towards(point - self.position)
    }

    /// Steering force that swings the velocity by `angle` radians.
    pub fn jitter(&self, angle: f32) -> Vector2D {
        (self.velocity.rotate(angle) - self.velocity).limit(self.max_steer_force)
    }

    /// [`Boid::jitter`] by an angle drawn from `[-randomness, randomness]`.
    #[cfg(feature = "std")]
    pub fn randomize<R: Rng + ?Sized>(&self, rng: &mut R, randomness: f32) -> Vector2D {
        if randomness <= 0.0 {
            return Vector2D::zero();
        }
        self.jitter(rng.gen_range(-randomness..=randomness))
    }

    /// Strict `<` distance test used by every neighbour scan.
    pub fn within(&self, other: &Boid, radius: f32) -> bool {
        self.position.distance(&other.position) < radius
    }

    /// Integrates one fixed step and wraps onto the plane.
    pub fn advance(&mut self, width: f32, height: f32) {
        self.advance_scaled(width, height, 1.0);
    }

    /// Integrates a step of `scale` nominal ticks. With `scale == 1.0` this
    /// is exactly the fixed-step rule.
    pub fn advance_scaled(&mut self, width: f32, height: f32, scale: f32) {
        self.velocity = (self.velocity + self.acceleration * scale).limit(self.max_speed);
        self.position += self.velocity * scale;
        self.acceleration = Vector2D::zero();

        self.position.x = wrap(self.position.x, width);
        self.position.y = wrap(self.position.y, height);
    }
}

#[cfg(feature = "std")]
fn sample<R: Rng + ?Sized>(rng: &mut R, upper: f32) -> f32 {
    if upper > 0.0 {
        rng.gen_range(0.0..upper)
    } else {
        0.0
    }
}
