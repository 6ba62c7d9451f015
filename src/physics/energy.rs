use crate::models::KinematicState;

/// Kinetic plus potential energy per unit mass (J/kg), with the potential
/// measured from altitude zero.
pub fn specific_mechanical_energy(state: &KinematicState, gravity: f64) -> f64 {
    let v = state.speed();
    0.5 * v * v + gravity * state.altitude()
}

pub fn mechanical_energy(state: &KinematicState, mass: f64, gravity: f64) -> f64 {
    mass * specific_mechanical_energy(state, gravity)
}
