//! Float helpers that pick `std` or `libm` depending on the build.

#[cfg(feature = "std")]
pub fn sqrt(value: f32) -> f32 {
    value.sqrt()
}

#[cfg(not(feature = "std"))]
pub fn sqrt(value: f32) -> f32 {
    libm::sqrtf(value)
}

#[cfg(feature = "std")]
pub fn atan2(y: f32, x: f32) -> f32 {
    y.atan2(x)
}

#[cfg(not(feature = "std"))]
pub fn atan2(y: f32, x: f32) -> f32 {
    libm::atan2f(y, x)
}

#[cfg(feature = "std")]
pub fn sin_cos(angle: f32) -> (f32, f32) {
    angle.sin_cos()
}

#[cfg(not(feature = "std"))]
pub fn sin_cos(angle: f32) -> (f32, f32) {
    libm::sincosf(angle)
}

#[cfg(feature = "std")]
pub fn rem(value: f32, bound: f32) -> f32 {
    value % bound
}

#[cfg(not(feature = "std"))]
pub fn rem(value: f32, bound: f32) -> f32 {
    libm::fmodf(value, bound)
}
