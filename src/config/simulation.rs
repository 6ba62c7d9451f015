use super::vehicle::LiftingBodyRamjet;
use crate::constants::G0;
use crate::errors::ConfigError;
use crate::models::vehicle::{frontal_area, VehicleParameters};
use crate::models::KinematicState;
use crate::physics::atmosphere::AtmosphereTable;
use crate::physics::environment::Environment;
use crate::physics::propulsion::Propulsion;
use hifitime::Epoch;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Run configuration as written by the user, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub vehicle: VehicleConfig,
    pub initial: InitialConditions,
    #[serde(default = "Propulsion::stoichiometric_ramjet")]
    pub propulsion: Propulsion,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    pub integration: IntegrationConfig,
    /// Gregorian UTC time of t = 0, used to stamp exported samples.
    #[serde(default)]
    pub launch_epoch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleConfig {
    pub mass: f64,
    pub lifting_area: f64,
    pub intake_area: f64,
    #[serde(default = "default_drag_coefficient")]
    pub drag_coefficient: f64,
    #[serde(default = "default_lift_coefficient")]
    pub lift_coefficient: f64,
    /// Drag reference area; derived from the lifting area when absent.
    #[serde(default)]
    pub drag_area: Option<f64>,
    #[serde(default)]
    pub propellant_capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitialConditions {
    pub speed: f64,
    /// Degrees.
    pub angle_of_attack: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub downrange: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    #[serde(default)]
    pub ground_altitude: f64,
    /// CSV file replacing the reference atmosphere.
    #[serde(default)]
    pub atmosphere_table: Option<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            gravity: G0,
            ground_altitude: 0.0,
            atmosphere_table: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntegrationConfig {
    /// Simulated time span (s), starting at t = 0.
    pub duration: f64,
    pub method: StepPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepPolicy {
    Euler {
        dt: f64,
    },
    #[serde(rename = "rk4")]
    RungeKutta4 {
        dt: f64,
    },
    DormandPrince {
        #[serde(default = "default_rtol")]
        rtol: f64,
        #[serde(default = "default_atol")]
        atol: f64,
        #[serde(default)]
        max_step: Option<f64>,
        output_interval: f64,
    },
}

fn default_drag_coefficient() -> f64 {
    LiftingBodyRamjet::C_D
}

fn default_lift_coefficient() -> f64 {
    LiftingBodyRamjet::C_L
}

fn default_gravity() -> f64 {
    G0
}

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-9
}

/// Checked, immutable inputs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub vehicle: VehicleParameters,
    pub initial_state: KinematicState,
    /// Radians.
    pub angle_of_attack: f64,
    pub propulsion: Propulsion,
    pub environment: Environment,
    pub duration: f64,
    pub step: StepPolicy,
    pub launch_epoch: Option<Epoch>,
}

fn finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::invalid(field, format!("{} is not a finite number", value)))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if finite(field, value)? < 0.0 {
        return Err(ConfigError::invalid(field, format!("{} must not be negative", value)));
    }
    Ok(value)
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if finite(field, value)? <= 0.0 {
        return Err(ConfigError::invalid(field, format!("{} must be greater than zero", value)));
    }
    Ok(value)
}

impl SimulationConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Lifting-body ramjet launched at 250 m/s, 5° nose up, from sea level.
    pub fn preset() -> Self {
        SimulationConfig {
            vehicle: VehicleConfig {
                mass: LiftingBodyRamjet::MASS,
                lifting_area: LiftingBodyRamjet::LIFTING_AREA,
                intake_area: LiftingBodyRamjet::INTAKE_AREA,
                drag_coefficient: LiftingBodyRamjet::C_D,
                lift_coefficient: LiftingBodyRamjet::C_L,
                drag_area: None,
                propellant_capacity: Some(LiftingBodyRamjet::PROPELLANT),
            },
            initial: InitialConditions {
                speed: 250.0,
                angle_of_attack: 5.0,
                altitude: 0.0,
                downrange: 0.0,
            },
            propulsion: Propulsion::stoichiometric_ramjet(),
            environment: EnvironmentConfig::default(),
            integration: IntegrationConfig {
                duration: 100.0,
                method: StepPolicy::RungeKutta4 { dt: 0.01 },
            },
            launch_epoch: None,
        }
    }

    /// Checks every field and builds the run inputs. Nothing is integrated
    /// unless this succeeds.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let vehicle = self.validate_vehicle()?;

        let speed = non_negative("initial.speed", self.initial.speed)?;
        let angle = finite("initial.angle_of_attack", self.initial.angle_of_attack)?;
        if !(-90.0..=90.0).contains(&angle) {
            return Err(ConfigError::invalid(
                "initial.angle_of_attack",
                format!("{} is outside [-90, 90] degrees", angle),
            ));
        }
        let altitude = finite("initial.altitude", self.initial.altitude)?;
        let downrange = finite("initial.downrange", self.initial.downrange)?;

        let environment = self.validate_environment()?;
        if environment.is_below_ground(altitude) {
            return Err(ConfigError::invalid(
                "initial.altitude",
                format!(
                    "{} m is below the ground altitude of {} m",
                    altitude, environment.ground_altitude
                ),
            ));
        }

        for (name, value) in self.propulsion.parameters() {
            non_negative("propulsion", value).map_err(|_| {
                ConfigError::invalid(
                    "propulsion",
                    format!("{} = {} must be finite and non-negative", name, value),
                )
            })?;
        }

        if let Propulsion::FuelConsumption {
            specific_fuel_consumption,
            ..
        } = self.propulsion
        {
            positive("propulsion.specific_fuel_consumption", specific_fuel_consumption)?;
        }

        let duration = positive("integration.duration", self.integration.duration)?;
        self.validate_step(duration)?;

        let launch_epoch = match &self.launch_epoch {
            Some(value) => Some(Epoch::from_gregorian_str(value).map_err(|e| {
                ConfigError::InvalidEpoch {
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(ValidatedConfig {
            vehicle,
            initial_state: KinematicState::from_launch(speed, angle, downrange, altitude),
            angle_of_attack: angle.to_radians(),
            propulsion: self.propulsion.clone(),
            environment,
            duration,
            step: self.integration.method,
            launch_epoch,
        })
    }

    fn validate_vehicle(&self) -> Result<VehicleParameters, ConfigError> {
        let v = &self.vehicle;
        let mass = positive("vehicle.mass", v.mass)?;
        let lifting_area = non_negative("vehicle.lifting_area", v.lifting_area)?;
        let drag_area = match v.drag_area {
            Some(area) => non_negative("vehicle.drag_area", area)?,
            None => frontal_area(lifting_area),
        };
        let propellant_capacity = match v.propellant_capacity {
            Some(capacity) => {
                let capacity = non_negative("vehicle.propellant_capacity", capacity)?;
                if capacity >= mass {
                    return Err(ConfigError::invalid(
                        "vehicle.propellant_capacity",
                        format!("{} kg leaves no dry mass out of {} kg", capacity, mass),
                    ));
                }
                Some(capacity)
            }
            None => None,
        };

        Ok(VehicleParameters {
            mass,
            lifting_area,
            intake_area: non_negative("vehicle.intake_area", v.intake_area)?,
            drag_coefficient: non_negative("vehicle.drag_coefficient", v.drag_coefficient)?,
            lift_coefficient: non_negative("vehicle.lift_coefficient", v.lift_coefficient)?,
            drag_area,
            propellant_capacity,
        })
    }

    fn validate_environment(&self) -> Result<Environment, ConfigError> {
        let env = &self.environment;
        let gravity = non_negative("environment.gravity", env.gravity)?;
        let ground_altitude = finite("environment.ground_altitude", env.ground_altitude)?;
        let atmosphere = match &env.atmosphere_table {
            Some(path) => AtmosphereTable::from_path(path)?,
            None => AtmosphereTable::reference().clone(),
        };
        Ok(Environment::new(atmosphere, gravity, ground_altitude))
    }

    fn validate_step(&self, duration: f64) -> Result<(), ConfigError> {
        let at_most_duration = |field: &'static str, value: f64| -> Result<f64, ConfigError> {
            if positive(field, value)? > duration {
                return Err(ConfigError::invalid(
                    field,
                    format!("{} s exceeds the {} s duration", value, duration),
                ));
            }
            Ok(value)
        };

        match self.integration.method {
            StepPolicy::Euler { dt } | StepPolicy::RungeKutta4 { dt } => {
                at_most_duration("integration.method.dt", dt)?;
            }
            StepPolicy::DormandPrince {
                rtol,
                atol,
                max_step,
                output_interval,
            } => {
                positive("integration.method.rtol", rtol)?;
                positive("integration.method.atol", atol)?;
                at_most_duration("integration.method.output_interval", output_interval)?;
                if let Some(max_step) = max_step {
                    positive("integration.method.max_step", max_step)?;
                }
            }
        }
        Ok(())
    }
}
