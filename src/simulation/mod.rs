pub mod runner;

pub use runner::Simulation;

use crate::config::SimulationConfig;
use crate::errors::ConfigError;

impl Simulation {
    /// Validates `config` and prepares a run from it.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Ok(Simulation::new(config.validate()?))
    }
}
