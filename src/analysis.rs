use crate::models::Trajectory;

/// Headline figures of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySummary {
    pub duration: f64,
    pub final_speed: f64,
    pub max_altitude: f64,
    pub downrange: f64,
    pub peak_thrust: f64,
    pub propellant_consumed: f64,
}

impl TrajectorySummary {
    /// `None` for a trajectory without samples.
    pub fn from_trajectory(trajectory: &Trajectory) -> Option<Self> {
        let first = trajectory.samples().first()?;
        let last = trajectory.last()?;

        let (max_altitude, peak_thrust) = trajectory.samples().iter().fold(
            (f64::NEG_INFINITY, 0.0_f64),
            |(altitude, thrust), s| (altitude.max(s.state.altitude()), thrust.max(s.thrust)),
        );

        Some(TrajectorySummary {
            duration: last.time - first.time,
            final_speed: last.state.speed(),
            max_altitude,
            downrange: last.state.downrange() - first.state.downrange(),
            peak_thrust,
            propellant_consumed: last.state.propellant_consumed - first.state.propellant_consumed,
        })
    }
}

impl std::fmt::Display for TrajectorySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Duration:            {:.2} s", self.duration)?;
        writeln!(f, "Final speed:         {:.2} m/s", self.final_speed)?;
        writeln!(f, "Maximum altitude:    {:.1} m", self.max_altitude)?;
        writeln!(f, "Downrange distance:  {:.1} m", self.downrange)?;
        writeln!(f, "Peak thrust:         {:.1} N", self.peak_thrust)?;
        write!(f, "Propellant consumed: {:.2} kg", self.propellant_consumed)
    }
}

/// Time of the first sample whose acceleration magnitude is lower than the
/// one before it.
pub fn acceleration_turnover_time(trajectory: &Trajectory) -> Option<f64> {
    trajectory
        .samples()
        .windows(2)
        .find(|pair| pair[1].acceleration.magnitude() < pair[0].acceleration.magnitude())
        .map(|pair| pair[1].time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KinematicState, Termination, TrajectorySample};
    use approx::assert_abs_diff_eq;
    use nalgebra as na;

    fn sample(time: f64, altitude: f64, accel: f64, thrust: f64, consumed: f64) -> TrajectorySample {
        let mut state = KinematicState::new(
            na::Vector2::new(3.0, 4.0),
            na::Vector2::new(10.0 * time, altitude),
        );
        state.propellant_consumed = consumed;
        TrajectorySample {
            time,
            state,
            acceleration: na::Vector2::new(accel, 0.0),
            thrust,
            density: 1.225,
            mass: 1000.0 - consumed,
        }
    }

    fn trajectory() -> Trajectory {
        Trajectory::new(
            vec![
                sample(0.0, 100.0, 1.0, 500.0, 0.0),
                sample(1.0, 180.0, 2.0, 900.0, 1.5),
                sample(2.0, 150.0, 1.5, 700.0, 2.5),
                sample(3.0, 90.0, 0.5, 0.0, 3.0),
            ],
            Termination::Completed,
        )
    }

    #[test]
    fn summary_covers_the_whole_run() {
        let summary = TrajectorySummary::from_trajectory(&trajectory()).unwrap();
        assert_eq!(summary.duration, 3.0);
        assert_abs_diff_eq!(summary.final_speed, 5.0, epsilon = 1e-12);
        assert_eq!(summary.max_altitude, 180.0);
        assert_eq!(summary.downrange, 30.0);
        assert_eq!(summary.peak_thrust, 900.0);
        assert_eq!(summary.propellant_consumed, 3.0);
    }

    #[test]
    fn empty_trajectory_has_no_summary() {
        let empty = Trajectory::new(vec![], Termination::MassDepleted { time: 0.0 });
        assert_eq!(TrajectorySummary::from_trajectory(&empty), None);
        assert_eq!(acceleration_turnover_time(&empty), None);
    }

    #[test]
    fn turnover_is_first_decrease() {
        assert_eq!(acceleration_turnover_time(&trajectory()), Some(2.0));
    }

    #[test]
    fn monotone_acceleration_never_turns_over() {
        let rising = Trajectory::new(
            vec![
                sample(0.0, 0.0, 1.0, 0.0, 0.0),
                sample(1.0, 0.0, 1.0, 0.0, 0.0),
                sample(2.0, 0.0, 3.0, 0.0, 0.0),
            ],
            Termination::Completed,
        );
        assert_eq!(acceleration_turnover_time(&rising), None);
    }
}
