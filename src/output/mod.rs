//! CSV export of trajectories.

use crate::models::{Trajectory, TrajectorySample};
use csv::Writer;
use hifitime::{Duration, Epoch};
use std::fs::{self, File};
use std::io;
use std::path::Path;

const COLUMNS: [&str; 12] = [
    "Time (s)",
    "Downrange (m)",
    "Altitude (m)",
    "Horizontal Velocity (m/s)",
    "Vertical Velocity (m/s)",
    "Speed (m/s)",
    "Acceleration X (m/s^2)",
    "Acceleration Y (m/s^2)",
    "Thrust (N)",
    "Air Density (kg/m^3)",
    "Mass (kg)",
    "Propellant Consumed (kg)",
];

/// Writes one row per sample. With a launch epoch, a leading `UTC Time`
/// column stamps each row with `epoch + time`.
pub fn write_trajectory<W: io::Write>(
    trajectory: &Trajectory,
    writer: W,
    launch_epoch: Option<Epoch>,
) -> Result<(), csv::Error> {
    let mut writer = Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(COLUMNS.len() + 1);
    if launch_epoch.is_some() {
        header.push("UTC Time");
    }
    header.extend(COLUMNS);
    writer.write_record(&header)?;

    for sample in trajectory.samples() {
        let mut record = Vec::with_capacity(header.len());
        if let Some(epoch) = launch_epoch {
            record.push((epoch + Duration::from_seconds(sample.time)).to_string());
        }
        record.extend(row(sample).iter().map(f64::to_string));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the trajectory to `path`, creating parent directories as needed.
pub fn write_trajectory_file<P: AsRef<Path>>(
    trajectory: &Trajectory,
    path: P,
    launch_epoch: Option<Epoch>,
) -> Result<(), csv::Error> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    write_trajectory(trajectory, File::create(path)?, launch_epoch)
}

fn row(sample: &TrajectorySample) -> [f64; 12] {
    let state = &sample.state;
    [
        sample.time,
        state.downrange(),
        state.altitude(),
        state.horizontal_velocity(),
        state.vertical_velocity(),
        state.speed(),
        sample.acceleration.x,
        sample.acceleration.y,
        sample.thrust,
        sample.density,
        sample.mass,
        state.propellant_consumed,
    ]
}
