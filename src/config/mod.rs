pub mod simulation;
pub mod vehicle;

pub use simulation::{
    EnvironmentConfig, InitialConditions, IntegrationConfig, SimulationConfig, StepPolicy,
    ValidatedConfig, VehicleConfig,
};
