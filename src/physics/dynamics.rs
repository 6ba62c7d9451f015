use super::drag::drag_force;
use super::environment::Environment;
use super::gravity::gravity_force;
use super::lift::lift_force;
use super::propulsion::{ThrustModel, ThrustOutput};
use crate::errors::DynamicsError;
use crate::models::vehicle::VehicleProperties;
use crate::models::KinematicState;
use nalgebra as na;

pub trait EquationsOfMotion {
    type State;

    fn compute_derivative(&self, state: &Self::State) -> Result<Self::State, DynamicsError>;
}

/// Every force acting on the vehicle at one state, plus what produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceBreakdown {
    pub thrust: f64,
    pub fuel_flow: f64,
    pub thrust_force: na::Vector2<f64>,
    pub drag: na::Vector2<f64>,
    pub lift: na::Vector2<f64>,
    pub gravity: na::Vector2<f64>,
    pub acceleration: na::Vector2<f64>,
    pub density: f64,
    pub mass: f64,
}

impl ForceBreakdown {
    pub fn net_force(&self) -> na::Vector2<f64> {
        self.thrust_force + self.drag + self.lift + self.gravity
    }
}

pub struct FlightDynamics<'a, V: VehicleProperties, P: ThrustModel> {
    vehicle: &'a V,
    environment: &'a Environment,
    propulsion: &'a P,
    angle_of_attack: f64,
    propellant_capacity: Option<f64>,
}

// Only references and scalars; copyable whatever V and P are.
impl<V: VehicleProperties, P: ThrustModel> Clone for FlightDynamics<'_, V, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: VehicleProperties, P: ThrustModel> Copy for FlightDynamics<'_, V, P> {}

impl<'a, V: VehicleProperties, P: ThrustModel> FlightDynamics<'a, V, P> {
    /// `angle_of_attack` is in radians.
    pub fn new(
        vehicle: &'a V,
        environment: &'a Environment,
        propulsion: &'a P,
        angle_of_attack: f64,
    ) -> Self {
        Self {
            vehicle,
            environment,
            propulsion,
            angle_of_attack,
            propellant_capacity: vehicle.propellant_capacity(),
        }
    }

    /// Same forces with the tank limit lifted, for integrating up to a
    /// flame-out time that is already known.
    pub fn without_propellant_limit(mut self) -> Self {
        self.propellant_capacity = None;
        self
    }

    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn current_mass(&self, state: &KinematicState) -> f64 {
        self.vehicle.mass() - state.propellant_consumed
    }

    pub fn is_flamed_out(&self, state: &KinematicState) -> bool {
        self.propellant_capacity
            .is_some_and(|capacity| state.propellant_consumed >= capacity)
    }

    pub fn forces(&self, state: &KinematicState) -> Result<ForceBreakdown, DynamicsError> {
        if !state.is_finite() {
            return Err(DynamicsError::NonFinite { quantity: "state" });
        }

        let mass = self.current_mass(state);
        if mass <= 0.0 {
            return Err(DynamicsError::MassDepleted { mass });
        }

        let density = self.environment.density(state.altitude());
        let speed = state.speed();

        let output = if self.is_flamed_out(state) {
            ThrustOutput::default()
        } else {
            self.propulsion.thrust_after(
                density,
                speed,
                self.vehicle.intake_area(),
                state.propellant_consumed,
            )
        };

        let (sin_a, cos_a) = self.angle_of_attack.sin_cos();
        let thrust_force = na::Vector2::new(output.force * cos_a, output.force * sin_a);
        let drag = drag_force(self.vehicle, density, &state.velocity);
        let lift = lift_force(self.vehicle, density, speed, self.angle_of_attack);
        let gravity = gravity_force(mass, self.environment.gravity);

        let acceleration = (thrust_force + drag + lift + gravity) / mass;
        if !(acceleration.x.is_finite() && acceleration.y.is_finite()) {
            return Err(DynamicsError::NonFinite {
                quantity: "acceleration",
            });
        }

        Ok(ForceBreakdown {
            thrust: output.force,
            fuel_flow: output.fuel_flow,
            thrust_force,
            drag,
            lift,
            gravity,
            acceleration,
            density,
            mass,
        })
    }
}

impl<'a, V: VehicleProperties, P: ThrustModel> EquationsOfMotion for FlightDynamics<'a, V, P> {
    type State = KinematicState;

    fn compute_derivative(&self, state: &KinematicState) -> Result<KinematicState, DynamicsError> {
        let forces = self.forces(state)?;

        Ok(KinematicState {
            velocity: forces.acceleration,
            position: state.velocity,
            propellant_consumed: forces.fuel_flow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vehicle::LiftingBodyRamjet;
    use crate::models::VehicleParameters;
    use crate::physics::propulsion::Propulsion;
    use approx::assert_abs_diff_eq;

    fn inert_vehicle() -> VehicleParameters {
        VehicleParameters {
            mass: 100.0,
            lifting_area: 0.0,
            intake_area: 0.0,
            drag_coefficient: 0.0,
            lift_coefficient: 0.0,
            drag_area: 0.0,
            propellant_capacity: None,
        }
    }

    #[test]
    fn ballistic_vehicle_only_feels_gravity() {
        let vehicle = inert_vehicle();
        let environment = Environment::default();
        let dynamics = FlightDynamics::new(&vehicle, &environment, &Propulsion::Unpowered, 0.3);

        let state = KinematicState::from_launch(120.0, 30.0, 0.0, 500.0);
        let forces = dynamics.forces(&state).unwrap();
        assert_abs_diff_eq!(forces.acceleration, na::Vector2::new(0.0, -9.81), epsilon = 1e-12);

        let derivative = dynamics.compute_derivative(&state).unwrap();
        assert_eq!(derivative.position, state.velocity);
        assert_eq!(derivative.propellant_consumed, 0.0);
    }

    #[test]
    fn zero_velocity_gives_finite_forces() {
        let vehicle = VehicleParameters::from_properties(&LiftingBodyRamjet);
        let environment = Environment::default();
        let propulsion = Propulsion::stoichiometric_ramjet();
        let dynamics = FlightDynamics::new(&vehicle, &environment, &propulsion, 0.1);

        let forces = dynamics.forces(&KinematicState::zero()).unwrap();
        assert_eq!(forces.drag, na::Vector2::zeros());
        assert_eq!(forces.lift, na::Vector2::zeros());
        assert_eq!(forces.thrust, 0.0);
        assert_abs_diff_eq!(forces.acceleration.y, -9.81, epsilon = 1e-12);
    }

    #[test]
    fn acceleration_is_net_force_over_current_mass() {
        let vehicle = VehicleParameters::from_properties(&LiftingBodyRamjet);
        let environment = Environment::default();
        let propulsion = Propulsion::stoichiometric_ramjet();
        let dynamics = FlightDynamics::new(&vehicle, &environment, &propulsion, 5.0_f64.to_radians());

        let mut state = KinematicState::from_launch(300.0, 5.0, 0.0, 2000.0);
        state.propellant_consumed = 1500.0;
        let forces = dynamics.forces(&state).unwrap();

        assert_eq!(forces.mass, 8500.0);
        assert_eq!(forces.density, 1.007);
        assert!(forces.thrust > 0.0 && forces.fuel_flow > 0.0);
        assert_abs_diff_eq!(forces.acceleration * forces.mass, forces.net_force(), epsilon = 1e-6);
        // drag opposes motion
        assert!(forces.drag.dot(&state.velocity) < 0.0);
    }

    #[test]
    fn engine_flames_out_when_tanks_are_empty() {
        let vehicle = VehicleParameters::from_properties(&LiftingBodyRamjet);
        let environment = Environment::default();
        let propulsion = Propulsion::stoichiometric_ramjet();
        let dynamics = FlightDynamics::new(&vehicle, &environment, &propulsion, 0.0);

        let mut state = KinematicState::from_launch(300.0, 0.0, 0.0, 1000.0);
        state.propellant_consumed = LiftingBodyRamjet::PROPELLANT;
        assert!(dynamics.is_flamed_out(&state));

        let forces = dynamics.forces(&state).unwrap();
        assert_eq!(forces.thrust, 0.0);
        assert_eq!(forces.fuel_flow, 0.0);
        assert_eq!(forces.mass, LiftingBodyRamjet::MASS - LiftingBodyRamjet::PROPELLANT);
    }

    #[test]
    fn lifting_the_tank_limit_keeps_the_engine_lit() {
        let vehicle = VehicleParameters::from_properties(&LiftingBodyRamjet);
        let environment = Environment::default();
        let propulsion = Propulsion::stoichiometric_ramjet();
        let dynamics = FlightDynamics::new(&vehicle, &environment, &propulsion, 0.0);

        let mut state = KinematicState::from_launch(300.0, 0.0, 0.0, 1000.0);
        state.propellant_consumed = LiftingBodyRamjet::PROPELLANT;
        assert!(dynamics.is_flamed_out(&state));

        let unlimited = dynamics.without_propellant_limit();
        assert!(!unlimited.is_flamed_out(&state));
        assert!(unlimited.forces(&state).unwrap().thrust > 0.0);
    }

    #[test]
    fn depleted_mass_is_reported() {
        let vehicle = inert_vehicle();
        let environment = Environment::default();
        let dynamics = FlightDynamics::new(&vehicle, &environment, &Propulsion::Unpowered, 0.0);

        let mut state = KinematicState::zero();
        state.propellant_consumed = 100.0;
        assert_eq!(
            dynamics.forces(&state),
            Err(DynamicsError::MassDepleted { mass: 0.0 })
        );
    }

    #[test]
    fn non_finite_state_is_reported() {
        let vehicle = inert_vehicle();
        let environment = Environment::default();
        let dynamics = FlightDynamics::new(&vehicle, &environment, &Propulsion::Unpowered, 0.0);

        let mut state = KinematicState::zero();
        state.velocity.x = f64::INFINITY;
        assert_eq!(
            dynamics.compute_derivative(&state),
            Err(DynamicsError::NonFinite { quantity: "state" })
        );
    }
}
