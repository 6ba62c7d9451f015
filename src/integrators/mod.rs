pub mod dormand_prince;
pub mod euler;
pub mod rk4;

use crate::errors::DynamicsError;
use crate::models::KinematicState;

/// A state the integrators can combine linearly and measure component-wise.
pub trait StateVector:
    Clone
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<f64, Output = Self>
{
    fn to_components(&self) -> Vec<f64>;
}

impl StateVector for KinematicState {
    fn to_components(&self) -> Vec<f64> {
        self.components().to_vec()
    }
}

pub trait FixedStepIntegrator {
    type State;

    fn integrate(&self, state: &Self::State, dt: f64) -> Result<Self::State, DynamicsError>;
}

/// Root-mean-square of `values[i] / scale[i]`.
pub(crate) fn rms_norm(values: &[f64], scale: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values
        .iter()
        .zip(scale)
        .map(|(v, s)| (v / s).powi(2))
        .sum();
    (sum / values.len() as f64).sqrt()
}
