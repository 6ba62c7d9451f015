pub mod sample;
pub mod state;
pub mod vehicle;

pub use sample::{Termination, Trajectory, TrajectorySample};
pub use state::KinematicState;
pub use vehicle::{VehicleParameters, VehicleProperties};
