//! Thrust strategies.
//!
//! Each variant keeps the formula it was derived from verbatim, including the
//! ones that are physically questionable, so that runs stay comparable.

use crate::constants::*;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrustOutput {
    /// Thrust magnitude (N), directed along the angle of attack.
    pub force: f64,
    /// Propellant drawn from the tanks (kg/s).
    pub fuel_flow: f64,
}

pub trait ThrustModel {
    fn thrust(&self, air_density: f64, speed: f64, intake_area: f64) -> ThrustOutput;

    /// Thrust once `propellant_consumed` kg have been burnt. Models that do
    /// not depend on the remaining load ignore it.
    fn thrust_after(
        &self,
        air_density: f64,
        speed: f64,
        intake_area: f64,
        propellant_consumed: f64,
    ) -> ThrustOutput {
        let _ = propellant_consumed;
        self.thrust(air_density, speed, intake_area)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Propulsion {
    Unpowered,
    /// Fixed thrust with no tracked fuel use (afterburning turbojet exercise).
    Constant { thrust: f64 },
    /// `baseline + coefficient * v`.
    LinearVelocity { baseline: f64, coefficient: f64 },
    /// Oxygen captured by the intake burns a stoichiometric share of methane;
    /// thrust is that fuel flow times `g0 * Isp`.
    StoichiometricRamjet {
        #[serde(default = "default_oxygen_fraction")]
        oxygen_fraction: f64,
        #[serde(default = "default_fuel_to_oxygen_ratio")]
        fuel_to_oxygen_ratio: f64,
        #[serde(default = "default_ramjet_isp")]
        specific_impulse: f64,
    },
    /// Captured air plus fuel, scaled by the fuel's energy content.
    EnergyFlux {
        #[serde(default = "default_capture_fraction")]
        capture_fraction: f64,
        #[serde(default = "default_fuel_to_oxygen_ratio")]
        fuel_ratio: f64,
        #[serde(default = "default_energy_density")]
        energy_density: f64,
        #[serde(default = "default_efficiency")]
        efficiency: f64,
        #[serde(default = "default_exhaust_factor")]
        exhaust_factor: f64,
    },
    /// Self-contained engine: `fuel_flow * g0 * Isp`.
    Rocket { fuel_flow: f64, specific_impulse: f64 },
    /// Fuel still on board divided by the thrust-specific fuel consumption,
    /// burning `tsfc * thrust` kg/s.
    FuelConsumption {
        fuel_load: f64,
        #[serde(default = "default_specific_fuel_consumption")]
        specific_fuel_consumption: f64,
    },
}

fn default_oxygen_fraction() -> f64 {
    OXYGEN_MASS_FRACTION
}

fn default_fuel_to_oxygen_ratio() -> f64 {
    METHANE_TO_OXYGEN_RATIO
}

fn default_ramjet_isp() -> f64 {
    RAMJET_SPECIFIC_IMPULSE
}

fn default_specific_fuel_consumption() -> f64 {
    SPECIFIC_FUEL_CONSUMPTION
}

fn default_capture_fraction() -> f64 {
    CAPTURE_FRACTION
}

fn default_energy_density() -> f64 {
    FUEL_ENERGY_DENSITY
}

fn default_efficiency() -> f64 {
    COMBUSTION_EFFICIENCY
}

fn default_exhaust_factor() -> f64 {
    EXHAUST_FACTOR
}

impl Propulsion {
    pub fn stoichiometric_ramjet() -> Self {
        Propulsion::StoichiometricRamjet {
            oxygen_fraction: OXYGEN_MASS_FRACTION,
            fuel_to_oxygen_ratio: METHANE_TO_OXYGEN_RATIO,
            specific_impulse: RAMJET_SPECIFIC_IMPULSE,
        }
    }

    pub fn energy_flux() -> Self {
        Propulsion::EnergyFlux {
            capture_fraction: CAPTURE_FRACTION,
            fuel_ratio: METHANE_TO_OXYGEN_RATIO,
            energy_density: FUEL_ENERGY_DENSITY,
            efficiency: COMBUSTION_EFFICIENCY,
            exhaust_factor: EXHAUST_FACTOR,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Propulsion::Unpowered => "unpowered",
            Propulsion::Constant { .. } => "constant",
            Propulsion::LinearVelocity { .. } => "linear_velocity",
            Propulsion::StoichiometricRamjet { .. } => "stoichiometric_ramjet",
            Propulsion::EnergyFlux { .. } => "energy_flux",
            Propulsion::Rocket { .. } => "rocket",
            Propulsion::FuelConsumption { .. } => "fuel_consumption",
        }
    }

    /// Named parameters, used by configuration validation.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Propulsion::Unpowered => vec![],
            Propulsion::Constant { thrust } => vec![("thrust", thrust)],
            Propulsion::LinearVelocity {
                baseline,
                coefficient,
            } => vec![("baseline", baseline), ("coefficient", coefficient)],
            Propulsion::StoichiometricRamjet {
                oxygen_fraction,
                fuel_to_oxygen_ratio,
                specific_impulse,
            } => vec![
                ("oxygen_fraction", oxygen_fraction),
                ("fuel_to_oxygen_ratio", fuel_to_oxygen_ratio),
                ("specific_impulse", specific_impulse),
            ],
            Propulsion::EnergyFlux {
                capture_fraction,
                fuel_ratio,
                energy_density,
                efficiency,
                exhaust_factor,
            } => vec![
                ("capture_fraction", capture_fraction),
                ("fuel_ratio", fuel_ratio),
                ("energy_density", energy_density),
                ("efficiency", efficiency),
                ("exhaust_factor", exhaust_factor),
            ],
            Propulsion::Rocket {
                fuel_flow,
                specific_impulse,
            } => vec![("fuel_flow", fuel_flow), ("specific_impulse", specific_impulse)],
            Propulsion::FuelConsumption {
                fuel_load,
                specific_fuel_consumption,
            } => vec![
                ("fuel_load", fuel_load),
                ("specific_fuel_consumption", specific_fuel_consumption),
            ],
        }
    }
}

impl ThrustModel for Propulsion {
    fn thrust(&self, air_density: f64, speed: f64, intake_area: f64) -> ThrustOutput {
        match *self {
            Propulsion::Unpowered => ThrustOutput::default(),
            Propulsion::Constant { thrust } => ThrustOutput {
                force: thrust,
                fuel_flow: 0.0,
            },
            Propulsion::LinearVelocity {
                baseline,
                coefficient,
            } => ThrustOutput {
                force: baseline + coefficient * speed,
                fuel_flow: 0.0,
            },
            Propulsion::StoichiometricRamjet {
                oxygen_fraction,
                fuel_to_oxygen_ratio,
                specific_impulse,
            } => {
                let oxygen_flow = oxygen_fraction * air_density * intake_area * speed;
                let fuel_flow = fuel_to_oxygen_ratio * oxygen_flow;
                ThrustOutput {
                    force: fuel_flow * G0 * specific_impulse,
                    fuel_flow,
                }
            }
            Propulsion::EnergyFlux {
                capture_fraction,
                fuel_ratio,
                energy_density,
                efficiency,
                exhaust_factor,
            } => {
                let captured = capture_fraction * air_density * speed * intake_area;
                ThrustOutput {
                    force: (captured * fuel_ratio + captured)
                        * (energy_density * efficiency * exhaust_factor)
                        * G0,
                    fuel_flow: 0.0,
                }
            }
            Propulsion::Rocket {
                fuel_flow,
                specific_impulse,
            } => ThrustOutput {
                force: fuel_flow * G0 * specific_impulse,
                fuel_flow,
            },
            Propulsion::FuelConsumption { .. } => {
                self.thrust_after(air_density, speed, intake_area, 0.0)
            }
        }
    }

    fn thrust_after(
        &self,
        air_density: f64,
        speed: f64,
        intake_area: f64,
        propellant_consumed: f64,
    ) -> ThrustOutput {
        match *self {
            Propulsion::FuelConsumption {
                fuel_load,
                specific_fuel_consumption,
            } => {
                let force = (fuel_load - propellant_consumed).max(0.0) / specific_fuel_consumption;
                ThrustOutput {
                    force,
                    fuel_flow: specific_fuel_consumption * force,
                }
            }
            _ => self.thrust(air_density, speed, intake_area),
        }
    }
}
