use super::FixedStepIntegrator;
use crate::errors::DynamicsError;
use crate::physics::dynamics::EquationsOfMotion;

/// Explicit forward Euler.
pub struct Euler<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> Euler<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    pub fn new(eom: T) -> Self {
        Euler { eom }
    }

    pub fn eom(&self) -> &T {
        &self.eom
    }

    pub fn integrate(&self, state: &T::State, dt: f64) -> Result<T::State, DynamicsError> {
        let k = self.eom.compute_derivative(state)?;
        Ok(state.clone() + k * dt)
    }
}

impl<T: EquationsOfMotion> FixedStepIntegrator for Euler<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    type State = T::State;

    fn integrate(&self, state: &T::State, dt: f64) -> Result<T::State, DynamicsError> {
        Euler::integrate(self, state, dt)
    }
}
