//! Adaptive Dormand-Prince RK5(4) pair.
//!
//! The fifth-order solution is propagated, the embedded fourth-order one only
//! drives step-size control. The last stage is evaluated at the new state, so
//! an accepted step hands its derivative to the next one (FSAL), and the same
//! end-point derivatives feed the cubic Hermite dense output.

use super::{rms_norm, StateVector};
use crate::errors::DynamicsError;
use crate::physics::dynamics::EquationsOfMotion;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth- minus fourth-order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerances {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }
}

/// Outcome of one attempted step. Accept it when `error_norm <= 1`.
#[derive(Debug, Clone)]
pub struct Trial<S> {
    pub state: S,
    pub derivative: S,
    pub error_norm: f64,
}

impl<S> Trial<S> {
    pub fn is_accepted(&self) -> bool {
        self.error_norm <= 1.0
    }
}

/// Continuous solution over one accepted step.
#[derive(Debug, Clone)]
pub struct DenseStep<S> {
    pub t0: f64,
    pub t1: f64,
    y0: S,
    f0: S,
    y1: S,
    f1: S,
}

impl<S: StateVector> DenseStep<S> {
    pub fn new(t0: f64, t1: f64, y0: S, f0: S, y1: S, f1: S) -> Self {
        Self {
            t0,
            t1,
            y0,
            f0,
            y1,
            f1,
        }
    }

    pub fn start(&self) -> &S {
        &self.y0
    }

    pub fn end(&self) -> &S {
        &self.y1
    }

    /// Cubic Hermite interpolant; returns the end points exactly.
    pub fn interpolate(&self, t: f64) -> S {
        if t <= self.t0 {
            return self.y0.clone();
        }
        if t >= self.t1 {
            return self.y1.clone();
        }

        let h = self.t1 - self.t0;
        let s = (t - self.t0) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        self.y0.clone() * (2.0 * s3 - 3.0 * s2 + 1.0)
            + self.f0.clone() * (h * (s3 - 2.0 * s2 + s))
            + self.y1.clone() * (3.0 * s2 - 2.0 * s3)
            + self.f1.clone() * (h * (s3 - s2))
    }
}

pub struct DormandPrince45<T: EquationsOfMotion> {
    eom: T,
    tolerances: Tolerances,
}

impl<T: EquationsOfMotion> DormandPrince45<T>
where
    T::State: StateVector,
{
    pub fn new(eom: T, tolerances: Tolerances) -> Self {
        Self { eom, tolerances }
    }

    pub fn eom(&self) -> &T {
        &self.eom
    }

    pub fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    /// Attempts a step of size `h` from `y`, whose derivative is `f`.
    pub fn attempt(&self, y: &T::State, f: &T::State, h: f64) -> Result<Trial<T::State>, DynamicsError> {
        let k1 = f.clone();
        let k2 = self.eom.compute_derivative(&(y.clone() + k1.clone() * (h * A21)))?;
        let k3 = self.eom.compute_derivative(
            &(y.clone() + k1.clone() * (h * A31) + k2.clone() * (h * A32)),
        )?;
        let k4 = self.eom.compute_derivative(
            &(y.clone() + k1.clone() * (h * A41) + k2.clone() * (h * A42) + k3.clone() * (h * A43)),
        )?;
        let k5 = self.eom.compute_derivative(
            &(y.clone()
                + k1.clone() * (h * A51)
                + k2.clone() * (h * A52)
                + k3.clone() * (h * A53)
                + k4.clone() * (h * A54)),
        )?;
        let k6 = self.eom.compute_derivative(
            &(y.clone()
                + k1.clone() * (h * A61)
                + k2 * (h * A62)
                + k3.clone() * (h * A63)
                + k4.clone() * (h * A64)
                + k5.clone() * (h * A65)),
        )?;

        let y1 = y.clone()
            + (k1.clone() * B1 + k3.clone() * B3 + k4.clone() * B4 + k5.clone() * B5 + k6.clone() * B6)
                * h;
        let k7 = self.eom.compute_derivative(&y1)?;

        let error = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7.clone() * E7) * h;

        let start = y.to_components();
        let end = y1.to_components();
        let scale: Vec<f64> = start
            .iter()
            .zip(&end)
            .map(|(a, b)| self.tolerances.atol + self.tolerances.rtol * a.abs().max(b.abs()))
            .collect();

        Ok(Trial {
            state: y1,
            derivative: k7,
            error_norm: rms_norm(&error.to_components(), &scale),
        })
    }

    /// Step size to try next, given the error norm of the last attempt.
    pub fn next_step(&self, h: f64, error_norm: f64) -> f64 {
        if error_norm == 0.0 {
            return h * MAX_FACTOR;
        }
        let factor = (SAFETY * error_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR);
        if error_norm > 1.0 {
            h * factor.min(1.0)
        } else {
            h * factor
        }
    }

    /// Starting step estimate from the local derivative scale (Hairer,
    /// Norsett & Wanner, section II.4), capped at `max_step`.
    pub fn initial_step(&self, y: &T::State, f: &T::State, max_step: f64) -> f64 {
        let y0 = y.to_components();
        let scale: Vec<f64> = y0
            .iter()
            .map(|c| self.tolerances.atol + self.tolerances.rtol * c.abs())
            .collect();

        let d0 = rms_norm(&y0, &scale);
        let d1 = rms_norm(&f.to_components(), &scale);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        let h0 = h0.min(max_step);

        let f1 = match self.eom.compute_derivative(&(y.clone() + f.clone() * h0)) {
            Ok(f1) => f1,
            Err(_) => return h0,
        };
        let d2 = rms_norm(&(f1 - f.clone()).to_components(), &scale) / h0;

        let h1 = if d1.max(d2) <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(0.2)
        };

        (100.0 * h0).min(h1).min(max_step)
    }
}
