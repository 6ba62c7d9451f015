use crate::models::vehicle::VehicleProperties;
use nalgebra as na;

/// Lift resolved with the fixed angle of attack rather than the flight-path
/// angle: `(-L sin a, L cos a)`.
pub fn lift_force<T: VehicleProperties>(
    vehicle: &T,
    density: f64,
    speed: f64,
    angle_of_attack: f64,
) -> na::Vector2<f64> {
    let lift = 0.5 * vehicle.lift_coefficient() * density * vehicle.lifting_area() * speed.powi(2);
    na::Vector2::new(-lift * angle_of_attack.sin(), lift * angle_of_attack.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vehicle::LiftingBodyRamjet;
    use approx::assert_abs_diff_eq;

    #[test]
    fn level_lift_is_vertical() {
        // 0.5 * 0.4 * 1.225 * 31 * 100²
        let lift = lift_force(&LiftingBodyRamjet, 1.225, 100.0, 0.0);
        assert_abs_diff_eq!(lift, na::Vector2::new(0.0, 75_950.0), epsilon = 1e-6);
    }

    #[test]
    fn pitched_lift_tilts_backwards() {
        let lift = lift_force(&LiftingBodyRamjet, 1.225, 100.0, 30.0_f64.to_radians());
        assert!(lift.x < 0.0);
        assert_abs_diff_eq!(lift.magnitude(), 75_950.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lift.y, 75_950.0 * 30.0_f64.to_radians().cos(), epsilon = 1e-6);
    }

    #[test]
    fn no_lift_at_rest() {
        let lift = lift_force(&LiftingBodyRamjet, 1.225, 0.0, 0.2);
        assert_eq!(lift.magnitude(), 0.0);
    }
}
