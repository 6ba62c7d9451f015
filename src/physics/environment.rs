use super::atmosphere::AtmosphereTable;
use crate::constants::G0;

/// Everything outside the vehicle that the force model depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub atmosphere: AtmosphereTable,
    pub gravity: f64,
    pub ground_altitude: f64,
}

impl Environment {
    pub fn new(atmosphere: AtmosphereTable, gravity: f64, ground_altitude: f64) -> Self {
        Environment {
            atmosphere,
            gravity,
            ground_altitude,
        }
    }

    pub fn density(&self, altitude: f64) -> f64 {
        self.atmosphere.density(altitude)
    }

    pub fn is_below_ground(&self, altitude: f64) -> bool {
        altitude < self.ground_altitude
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(AtmosphereTable::reference().clone(), G0, 0.0)
    }
}
