use nalgebra as na;

/// Uniform gravity, `m g` straight down.
pub fn gravity_force(mass: f64, gravity: f64) -> na::Vector2<f64> {
    na::Vector2::new(0.0, -mass * gravity)
}
