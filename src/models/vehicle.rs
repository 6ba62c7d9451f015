use crate::constants::{FRONTAL_RADIUS_DIVISOR, PI};

pub trait VehicleProperties {
    fn mass(&self) -> f64;
    fn lifting_area(&self) -> f64;
    fn intake_area(&self) -> f64;
    fn drag_coefficient(&self) -> f64;
    fn lift_coefficient(&self) -> f64;

    /// Area the drag coefficient is referenced to.
    fn reference_area(&self) -> f64 {
        frontal_area(self.lifting_area())
    }

    /// Usable propellant on board. `None` means the engine draws without limit.
    fn propellant_capacity(&self) -> Option<f64> {
        None
    }
}

/// Semi-circular frontal cross-section whose radius is the lifting area
/// divided by [`FRONTAL_RADIUS_DIVISOR`].
pub fn frontal_area(lifting_area: f64) -> f64 {
    0.5 * PI * (lifting_area / FRONTAL_RADIUS_DIVISOR).powi(2)
}

/// Immutable vehicle description for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleParameters {
    pub mass: f64,
    pub lifting_area: f64,
    pub intake_area: f64,
    pub drag_coefficient: f64,
    pub lift_coefficient: f64,
    pub drag_area: f64,
    pub propellant_capacity: Option<f64>,
}

impl VehicleParameters {
    pub fn from_properties<V: VehicleProperties>(vehicle: &V) -> Self {
        Self {
            mass: vehicle.mass(),
            lifting_area: vehicle.lifting_area(),
            intake_area: vehicle.intake_area(),
            drag_coefficient: vehicle.drag_coefficient(),
            lift_coefficient: vehicle.lift_coefficient(),
            drag_area: vehicle.reference_area(),
            propellant_capacity: vehicle.propellant_capacity(),
        }
    }

    pub fn dry_mass(&self) -> Option<f64> {
        self.propellant_capacity.map(|capacity| self.mass - capacity)
    }
}

impl VehicleProperties for VehicleParameters {
    fn mass(&self) -> f64 {
        self.mass
    }

    fn lifting_area(&self) -> f64 {
        self.lifting_area
    }

    fn intake_area(&self) -> f64 {
        self.intake_area
    }

    fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    fn lift_coefficient(&self) -> f64 {
        self.lift_coefficient
    }

    fn reference_area(&self) -> f64 {
        self.drag_area
    }

    fn propellant_capacity(&self) -> Option<f64> {
        self.propellant_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn frontal_area_of_x24_sized_body() {
        // 31 m² lifting area -> radius 6.89 m
        assert_relative_eq!(frontal_area(31.0), 74.545, epsilon = 1e-3);
    }

    #[test]
    fn parameters_copy_preset_properties() {
        struct Glider;
        impl VehicleProperties for Glider {
            fn mass(&self) -> f64 {
                500.0
            }
            fn lifting_area(&self) -> f64 {
                9.0
            }
            fn intake_area(&self) -> f64 {
                0.0
            }
            fn drag_coefficient(&self) -> f64 {
                0.03
            }
            fn lift_coefficient(&self) -> f64 {
                0.6
            }
        }

        let params = VehicleParameters::from_properties(&Glider);
        assert_eq!(params.mass, 500.0);
        assert_relative_eq!(params.drag_area, frontal_area(9.0));
        assert_eq!(params.propellant_capacity, None);
        assert_eq!(params.dry_mass(), None);
    }
}
