use crate::math;

/// A 2D vector used for position, velocity and steering forces.
///
/// All operations return new values; nothing mutates in place except the
/// `*Assign` operators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Unit vector pointing along `angle` radians.
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = math::sin_cos(angle);
        Self { x: cos, y: sin }
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.magnitude_squared())
    }

    /// Squared length, for comparisons that can skip the square root.
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Returns the unit vector in the same direction.
    ///
    /// A zero-length vector has no direction and normalizes to zero instead
    /// of producing NaN.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            *self * (1.0 / mag)
        } else {
            Self::zero()
        }
    }

    /// Shrinks the vector to length `max` if it is longer; shorter vectors
    /// are returned unchanged.
    pub fn limit(&self, max: f32) -> Self {
        if self.magnitude_squared() > max * max {
            self.normalize() * max
        } else {
            *self
        }
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotate(&self, angle: f32) -> Self {
        let (sin, cos) = math::sin_cos(angle);
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Signed angle of the vector in radians, in `(-PI, PI]`.
    pub fn heading(&self) -> f32 {
        math::atan2(self.y, self.x)
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Toroidal wrap of `value` into `[0, bound)`, negative inputs included.
///
/// A non-positive `bound` describes no plane at all, so the value is
/// returned untouched.
pub fn wrap(value: f32, bound: f32) -> f32 {
    if bound <= 0.0 {
        return value;
    }
    math::rem(math::rem(value, bound) + bound, bound)
}

/// Smallest signed difference `to - from` between two angles, in `[-PI, PI)`.
pub fn angle_difference(to: f32, from: f32) -> f32 {
    use core::f32::consts::{PI, TAU};
    wrap(to - from + PI, TAU) - PI
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

    /// Component-wise division; callers never pass zero.
    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
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
