use crate::models::vehicle::VehicleProperties;

/// Lifting-body ramjet sized after the X-24 airframe.
pub struct LiftingBodyRamjet;

impl LiftingBodyRamjet {
    pub const MASS: f64 = 10_000.0; // kg
    pub const PROPELLANT: f64 = 4_000.0; // kg
    pub const LIFTING_AREA: f64 = 31.0; // m²
    pub const INTAKE_AREA: f64 = 1.0; // m², scaled from the X-43
    pub const C_D: f64 = 0.025; // X-24B
    pub const C_L: f64 = 0.4;
}

impl VehicleProperties for LiftingBodyRamjet {
    fn mass(&self) -> f64 {
        Self::MASS
    }

    fn lifting_area(&self) -> f64 {
        Self::LIFTING_AREA
    }

    fn intake_area(&self) -> f64 {
        Self::INTAKE_AREA
    }

    fn drag_coefficient(&self) -> f64 {
        Self::C_D
    }

    fn lift_coefficient(&self) -> f64 {
        Self::C_L
    }

    fn propellant_capacity(&self) -> Option<f64> {
        Some(Self::PROPELLANT)
    }
}
