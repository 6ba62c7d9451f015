use crate::models::vehicle::VehicleProperties;
use nalgebra as na;

/// Quadratic drag opposing the velocity vector. A vehicle at rest feels none.
pub fn drag_force<T: VehicleProperties>(
    vehicle: &T,
    density: f64,
    velocity: &na::Vector2<f64>,
) -> na::Vector2<f64> {
    let v: f64 = velocity.magnitude();
    let force_magnitude: f64 =
        -0.5 * vehicle.drag_coefficient() * vehicle.reference_area() * density * v.powi(2);

    match velocity.try_normalize(0.0) {
        Some(direction) => direction * force_magnitude,
        None => na::Vector2::zeros(),
    }
}
