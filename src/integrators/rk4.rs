use super::FixedStepIntegrator;
use crate::errors::DynamicsError;
use crate::physics::dynamics::EquationsOfMotion;

pub struct RK4<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> RK4<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    pub fn new(eom: T) -> Self {
        RK4 { eom }
    }

    pub fn eom(&self) -> &T {
        &self.eom
    }

    pub fn integrate(&self, state: &T::State, dt: f64) -> Result<T::State, DynamicsError> {
        let k1 = self.eom.compute_derivative(state)?;

        let state2 = state.clone() + k1.clone() * (dt / 2.0);
        let k2 = self.eom.compute_derivative(&state2)?;

        let state3 = state.clone() + k2.clone() * (dt / 2.0);
        let k3 = self.eom.compute_derivative(&state3)?;

        let state4 = state.clone() + k3.clone() * dt;
        let k4 = self.eom.compute_derivative(&state4)?;

        Ok(state.clone() + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0))
    }
}

impl<T: EquationsOfMotion> FixedStepIntegrator for RK4<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    type State = T::State;

    fn integrate(&self, state: &T::State, dt: f64) -> Result<T::State, DynamicsError> {
        RK4::integrate(self, state, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrators::euler::Euler;
    use approx::assert_relative_eq;

    /// dy/dt = -y on a scalar.
    struct Decay;

    impl EquationsOfMotion for Decay {
        type State = f64;

        fn compute_derivative(&self, state: &f64) -> Result<f64, DynamicsError> {
            Ok(-state)
        }
    }

    fn propagate<I: FixedStepIntegrator<State = f64>>(integrator: &I, dt: f64, steps: usize) -> f64 {
        let mut y = 1.0;
        for _ in 0..steps {
            y = integrator.integrate(&y, dt).unwrap();
        }
        y
    }

    #[test]
    fn rk4_matches_exponential_decay() {
        let y = propagate(&RK4::new(Decay), 0.01, 100);
        assert_relative_eq!(y, (-1.0_f64).exp(), max_relative = 1e-9);
    }

    #[test]
    fn rk4_is_fourth_order() {
        let exact = (-1.0_f64).exp();
        let coarse = (propagate(&RK4::new(Decay), 0.1, 10) - exact).abs();
        let fine = (propagate(&RK4::new(Decay), 0.05, 20) - exact).abs();
        let order = (coarse / fine).log2();
        assert!((order - 4.0).abs() < 0.2, "observed order {}", order);
    }

    #[test]
    fn rk4_beats_euler_at_equal_step() {
        let exact = (-1.0_f64).exp();
        let rk4 = (propagate(&RK4::new(Decay), 0.1, 10) - exact).abs();
        let euler = (propagate(&Euler::new(Decay), 0.1, 10) - exact).abs();
        assert!(rk4 < euler * 1e-3);
    }
}
