use crate::config::{StepPolicy, ValidatedConfig};
use crate::errors::DynamicsError;
use crate::integrators::dormand_prince::{DenseStep, DormandPrince45, Tolerances};
use crate::integrators::euler::Euler;
use crate::integrators::rk4::RK4;
use crate::integrators::FixedStepIntegrator;
use crate::models::{KinematicState, Termination, Trajectory, TrajectorySample, VehicleParameters};
use crate::physics::dynamics::{EquationsOfMotion, FlightDynamics, ForceBreakdown};
use crate::physics::propulsion::Propulsion;
use log::{debug, info, warn};

type Dynamics<'a> = FlightDynamics<'a, VehicleParameters, Propulsion>;

const BISECTION_ITERATIONS: usize = 60;
const STAGE_FAILURE_SHRINK: f64 = 0.25;
const PREALLOCATED_SAMPLES: u64 = 1 << 16;
/// A stalled adaptive run whose remaining mass would burn off within this
/// fraction of the duration is reported as depleted.
const BURN_OUT_HORIZON: f64 = 1e-5;

/// One run of the flight model. Each run owns its inputs; nothing is shared
/// between runs except the read-only reference atmosphere.
pub struct Simulation {
    config: ValidatedConfig,
}

impl Simulation {
    pub fn new(config: ValidatedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Integrates from t = 0 to the configured duration or until a terminal
    /// condition. Only an invalid initial state is an error; anything that
    /// goes wrong later ends the trajectory at its last valid sample.
    pub fn run(&self) -> Result<Trajectory, DynamicsError> {
        let config = &self.config;
        let dynamics = FlightDynamics::new(
            &config.vehicle,
            &config.environment,
            &config.propulsion,
            config.angle_of_attack,
        );

        info!(
            "Starting {} s run: {} propulsion, {:?}",
            config.duration,
            config.propulsion.name(),
            config.step
        );

        let trajectory = match config.step {
            StepPolicy::Euler { dt } => self.run_fixed(&dynamics, Euler::new, dt)?,
            StepPolicy::RungeKutta4 { dt } => self.run_fixed(&dynamics, RK4::new, dt)?,
            StepPolicy::DormandPrince {
                rtol,
                atol,
                max_step,
                output_interval,
            } => {
                let solver = DormandPrince45::new(dynamics, Tolerances::new(rtol, atol));
                let max_step = max_step.unwrap_or(config.duration).min(config.duration);
                self.run_adaptive(&dynamics, &solver, max_step, output_interval)?
            }
        };

        info!(
            "Run finished with {} samples: {}",
            trajectory.len(),
            trajectory.termination()
        );
        Ok(trajectory)
    }

    fn run_fixed<'a, I, F>(&self, dynamics: &Dynamics<'a>, make: F, dt: f64) -> Result<Trajectory, DynamicsError>
    where
        I: FixedStepIntegrator<State = KinematicState>,
        F: Fn(Dynamics<'a>) -> I,
    {
        let duration = self.config.duration;
        let ground = self.config.environment.ground_altitude;
        // Saturates for absurdly fine grids; ground impact or depletion ends those first.
        let steps = (duration / dt - 1e-9).ceil().clamp(1.0, u64::MAX as f64) as u64;

        let integrator = make(*dynamics);
        let burning = make(dynamics.without_propellant_limit());

        let mut state = self.config.initial_state;
        let mut t = 0.0;
        let mut forces = dynamics.forces(&state)?;
        let mut samples = Vec::with_capacity((steps.min(PREALLOCATED_SAMPLES) + 1) as usize);
        samples.push(sample(t, state, &forces));

        for i in 1..=steps {
            let t_next = if i == steps { duration } else { i as f64 * dt };

            let next = match self.advance(dynamics, &integrator, &burning, &state, forces.fuel_flow, t_next - t) {
                Ok(next) => next,
                Err(e) => return Ok(Trajectory::new(samples, terminal(&e, t))),
            };

            if next.altitude() < ground {
                let fraction = (state.altitude() - ground) / (state.altitude() - next.altitude());
                let impact = t + fraction * (t_next - t);
                return Ok(Trajectory::new(samples, Termination::GroundImpact { time: impact }));
            }

            forces = match dynamics.forces(&next) {
                Ok(forces) => forces,
                Err(e) => return Ok(Trajectory::new(samples, terminal(&e, t))),
            };

            state = next;
            t = t_next;
            samples.push(sample(t, state, &forces));
        }

        Ok(Trajectory::new(samples, Termination::Completed))
    }

    /// One fixed step of length `h`. A step in which the tanks run dry is
    /// split at the flame-out time so thrust stops with the propellant.
    fn advance<I>(
        &self,
        dynamics: &Dynamics<'_>,
        integrator: &I,
        burning: &I,
        state: &KinematicState,
        fuel_flow: f64,
        h: f64,
    ) -> Result<KinematicState, DynamicsError>
    where
        I: FixedStepIntegrator<State = KinematicState>,
    {
        if let Some(capacity) = self.config.vehicle.propellant_capacity {
            let remaining = capacity - state.propellant_consumed;
            if fuel_flow > 0.0 && remaining > 0.0 && remaining < fuel_flow * h {
                let burn = remaining / fuel_flow;
                let mut flamed_out = burning.integrate(state, burn)?;
                // the burn ends at the estimated flame-out time
                flamed_out.propellant_consumed = capacity;
                debug!("Propellant exhausted, engine flamed out");
                return integrator.integrate(&flamed_out, h - burn);
            }
        }

        let next = integrator.integrate(state, h)?;
        Ok(self.settle(dynamics, state, next))
    }

    fn run_adaptive(
        &self,
        dynamics: &Dynamics<'_>,
        solver: &DormandPrince45<Dynamics<'_>>,
        max_step: f64,
        output_interval: f64,
    ) -> Result<Trajectory, DynamicsError> {
        let duration = self.config.duration;
        let min_step = 1e-9 * duration;

        let mut y = self.config.initial_state;
        let initial_forces = dynamics.forces(&y)?;
        let mut f = dynamics.compute_derivative(&y)?;
        let mut t = 0.0;

        let mut samples = vec![sample(t, y, &initial_forces)];
        let mut outputs = OutputGrid::new(output_interval, duration);
        let mut h = solver.initial_step(&y, &f, max_step);
        let mut rejected = 0usize;

        while t < duration {
            // the starting estimate can collapse to zero when derivatives overflow the error scale
            h = h.max(min_step).min(max_step).min(duration - t);

            let trial = match solver.attempt(&y, &f, h) {
                Ok(trial) if trial.error_norm.is_finite() => trial,
                failed => {
                    let error = failed.err().unwrap_or(DynamicsError::NonFinite {
                        quantity: "error estimate",
                    });
                    if h * STAGE_FAILURE_SHRINK < min_step {
                        let end = self
                            .burnt_out(dynamics, &y, &f, t)
                            .unwrap_or_else(|| terminal(&error, t));
                        return Ok(Trajectory::new(samples, end));
                    }
                    warn!("Stage evaluation failed at t={:.6}s ({}), retrying with a smaller step", t, error);
                    h *= STAGE_FAILURE_SHRINK;
                    continue;
                }
            };

            if !trial.is_accepted() {
                rejected += 1;
                h = solver.next_step(h, trial.error_norm);
                debug!("Rejected step at t={:.6}s, error norm {:.3e}", t, trial.error_norm);
                if h < min_step {
                    let end = self.burnt_out(dynamics, &y, &f, t).unwrap_or_else(|| {
                        warn!("Step size underflow at t={:.6}s", t);
                        Termination::InvalidState {
                            time: t,
                            reason: "step size underflow".to_string(),
                        }
                    });
                    return Ok(Trajectory::new(samples, end));
                }
                continue;
            }

            let t1 = if duration - (t + h) <= 1e-12 * duration { duration } else { t + h };
            let y1 = self.settle(dynamics, &y, trial.state);
            let f1 = if y1 == trial.state {
                trial.derivative
            } else {
                match dynamics.compute_derivative(&y1) {
                    Ok(f1) => f1,
                    Err(e) => return Ok(Trajectory::new(samples, terminal(&e, t))),
                }
            };
            let dense = DenseStep::new(t, t1, y, f, y1, f1);

            if let Some(end) = self.emit_outputs(dynamics, &dense, &mut outputs, &mut samples) {
                debug!("{} samples, {} rejected steps", samples.len(), rejected);
                return Ok(Trajectory::new(samples, end));
            }

            h = solver.next_step(h, trial.error_norm);
            t = t1;
            y = y1;
            f = f1;
        }

        debug!("{} samples, {} rejected steps", samples.len(), rejected);
        Ok(Trajectory::new(samples, Termination::Completed))
    }

    /// Samples every output time inside an accepted step. Returns how the run
    /// ends if the vehicle reaches the ground within the step. Contact is seen
    /// at the step end and at output times; a dip between two of them that
    /// recovers before the step end goes unnoticed.
    fn emit_outputs(
        &self,
        dynamics: &Dynamics<'_>,
        dense: &DenseStep<KinematicState>,
        outputs: &mut OutputGrid,
        samples: &mut Vec<TrajectorySample>,
    ) -> Option<Termination> {
        let ground = self.config.environment.ground_altitude;
        let impact = if dense.end().altitude() < ground {
            Some(ground_crossing(dense, ground, dense.t0, dense.t1))
        } else {
            None
        };

        let mut above = dense.t0;
        while let Some(t_out) = outputs.next_before(impact.unwrap_or(dense.t1)) {
            let state = self.clamp_propellant(dense.interpolate(t_out));
            if state.altitude() < ground {
                let time = ground_crossing(dense, ground, above, t_out);
                return Some(Termination::GroundImpact { time });
            }
            match dynamics.forces(&state) {
                Ok(forces) => samples.push(sample(t_out, state, &forces)),
                Err(e) => return Some(terminal(&e, above)),
            }
            above = t_out;
        }

        impact.map(|time| Termination::GroundImpact { time })
    }

    /// With unlimited propellant the acceleration diverges as the mass runs
    /// out, which stalls the step control just short of depletion. Reports
    /// that case once the step can no longer shrink.
    fn burnt_out(
        &self,
        dynamics: &Dynamics<'_>,
        y: &KinematicState,
        f: &KinematicState,
        t: f64,
    ) -> Option<Termination> {
        let fuel_flow = f.propellant_consumed;
        let mass = dynamics.current_mass(y);
        let burning_out = self.config.vehicle.propellant_capacity.is_none()
            && fuel_flow > 0.0
            && mass <= fuel_flow * BURN_OUT_HORIZON * self.config.duration;

        burning_out.then(|| terminal(&DynamicsError::MassDepleted { mass }, t))
    }

    /// Holds the tanks at empty once the propellant capacity is spent, so the
    /// mass never drops below the dry mass.
    fn settle(&self, dynamics: &Dynamics<'_>, previous: &KinematicState, next: KinematicState) -> KinematicState {
        let settled = self.clamp_propellant(next);
        if settled != next && !dynamics.is_flamed_out(previous) {
            debug!("Propellant exhausted, engine flamed out");
        }
        settled
    }

    fn clamp_propellant(&self, mut state: KinematicState) -> KinematicState {
        if let Some(capacity) = self.config.vehicle.propellant_capacity {
            state.propellant_consumed = state.propellant_consumed.min(capacity);
        }
        state
    }
}

fn sample(time: f64, state: KinematicState, forces: &ForceBreakdown) -> TrajectorySample {
    TrajectorySample {
        time,
        state,
        acceleration: forces.acceleration,
        thrust: forces.thrust,
        density: forces.density,
        mass: forces.mass,
    }
}

/// Maps a force-model failure to the reason the run stopped.
fn terminal(error: &DynamicsError, time: f64) -> Termination {
    match error {
        DynamicsError::MassDepleted { .. } => {
            warn!("Vehicle mass depleted after t={:.3}s", time);
            Termination::MassDepleted { time }
        }
        DynamicsError::NonFinite { .. } => {
            warn!("Stopping at t={:.3}s: {}", time, error);
            Termination::InvalidState {
                time,
                reason: error.to_string(),
            }
        }
    }
}

/// Time in `[above, below]` at which the interpolated altitude falls through
/// `ground`, given it is above at `above` and below at `below`.
fn ground_crossing(dense: &DenseStep<KinematicState>, ground: f64, mut above: f64, mut below: f64) -> f64 {
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (above + below);
        if dense.interpolate(mid).altitude() < ground {
            below = mid;
        } else {
            above = mid;
        }
    }
    above
}

/// Uniform output times `k * interval`, ending exactly at the duration.
struct OutputGrid {
    interval: f64,
    duration: f64,
    next: usize,
    done: bool,
}

impl OutputGrid {
    fn new(interval: f64, duration: f64) -> Self {
        Self {
            interval,
            duration,
            next: 1,
            done: false,
        }
    }

    fn peek(&self) -> Option<f64> {
        if self.done {
            return None;
        }
        let t = self.next as f64 * self.interval;
        if t >= self.duration * (1.0 - 1e-12) {
            Some(self.duration)
        } else {
            Some(t)
        }
    }

    /// Next output time not later than `limit`.
    fn next_before(&mut self, limit: f64) -> Option<f64> {
        let t = self.peek()?;
        if t > limit {
            return None;
        }
        if t == self.duration {
            self.done = true;
        }
        self.next += 1;
        Some(t)
    }
}
