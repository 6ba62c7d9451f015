use super::state::KinematicState;
use nalgebra as na;

/// One output point of a run. Samples are created once and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySample {
    pub time: f64,
    pub state: KinematicState,
    pub acceleration: na::Vector2<f64>,
    pub thrust: f64,
    pub density: f64,
    pub mass: f64,
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    Completed,
    GroundImpact { time: f64 },
    MassDepleted { time: f64 },
    InvalidState { time: f64, reason: String },
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Termination::Completed => write!(f, "completed"),
            Termination::GroundImpact { time } => write!(f, "ground impact at t={:.3}s", time),
            Termination::MassDepleted { time } => write!(f, "mass depleted at t={:.3}s", time),
            Termination::InvalidState { time, reason } => {
                write!(f, "invalid state at t={:.3}s: {}", time, reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
    termination: Termination,
}

impl Trajectory {
    pub fn new(samples: Vec<TrajectorySample>, termination: Termination) -> Self {
        Self {
            samples,
            termination,
        }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Completed
    }

    /// Last valid sample of the run.
    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn into_samples(self) -> Vec<TrajectorySample> {
        self.samples
    }
}
