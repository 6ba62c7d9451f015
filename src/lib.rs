pub mod analysis;
pub mod config;
pub mod constants;
pub mod errors;
pub mod integrators;
pub mod models;
pub mod output;
pub mod physics;
pub mod simulation;
