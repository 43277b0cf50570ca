use bevy::{log::LogPlugin, prelude::*};
use std::env;

use quadflyer::{
    plugins::{QuadSimPlugin, SimulationStatus},
    resources::SimulationConfig,
    simulation::FlightLog,
    utils::SimError,
};

/// Usage: quadflyer_run [config.yaml] [flight_log.json]
fn main() -> Result<(), SimError> {
    let mut args = env::args().skip(1);
    let config_path = args.next();
    let output_path = args.next().unwrap_or_else(|| "flight_log.json".to_string());

    let config = match &config_path {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut app = App::new();
    app.add_plugins(LogPlugin::default())
        .add_plugins(QuadSimPlugin::new(config)?);
    app.finish();
    app.cleanup();

    match &config_path {
        Some(path) => info!("Loaded configuration from {}", path),
        None => info!("No configuration given, flying the default trajectory"),
    }

    while *app.world().resource::<SimulationStatus>() == SimulationStatus::Running {
        app.world_mut().run_schedule(FixedUpdate);
    }

    let status = app.world().resource::<SimulationStatus>().clone();
    let log = app.world().resource::<FlightLog>();
    log.save_json(&output_path)?;
    info!("Wrote {} records to {}", log.len(), output_path);

    match status {
        SimulationStatus::Halted {
            last_valid_tick,
            last_valid_time,
            reason,
        } => {
            error!(
                "Run halted after tick {} (t={:.4}s): {}",
                last_valid_tick, last_valid_time, reason
            );
            std::process::exit(1);
        }
        _ => Ok(()),
    }
}
