use flightpath::analysis::{acceleration_turnover_time, TrajectorySummary};
use flightpath::config::SimulationConfig;
use flightpath::output::write_trajectory_file;
use flightpath::simulation::Simulation;
use log::info;
use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("Loading configuration from {}", path);
            SimulationConfig::from_path(&path)?
        }
        None => {
            info!("No configuration given, running the lifting-body ramjet preset");
            SimulationConfig::preset()
        }
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output").join("trajectory.csv"));

    let simulation = Simulation::from_config(&config)?;
    let trajectory = simulation.run()?;

    write_trajectory_file(&trajectory, &output, simulation.config().launch_epoch)?;
    println!("Trajectory has been written to {}", output.display());

    println!("Termination: {}", trajectory.termination());
    if let Some(summary) = TrajectorySummary::from_trajectory(&trajectory) {
        println!("{}", summary);
    }
    if let Some(t) = acceleration_turnover_time(&trajectory) {
        println!("Acceleration starts to fall at t={:.2} s", t);
    }

    Ok(())
}
