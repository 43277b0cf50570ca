use quadflyer::{
    resources::{ControlScheme, SimulationConfig, WindConfig, WorldFrame},
    simulation::{FlightLog, Simulation},
    utils::SimError,
};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::common::create_gust_wind;

#[test]
fn test_yaml_round_trip_reproduces_run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulationConfig {
        frame: WorldFrame::Enu,
        duration: 2.0,
        wind: create_gust_wind(5),
        ..Default::default()
    };
    let temp_file = NamedTempFile::new()?;
    config.save(temp_file.path())?;
    let loaded = SimulationConfig::load(temp_file.path())?;

    let mut original = Simulation::new(config)?;
    let mut reloaded = Simulation::new(loaded)?;
    original.run()?;
    reloaded.run()?;
    assert_eq!(original.log(), reloaded.log());

    let log_file = NamedTempFile::new()?;
    original.log().save_json(log_file.path())?;
    assert_eq!(&FlightLog::load_json(log_file.path())?, original.log());
    Ok(())
}

#[test]
fn test_hand_written_yaml() -> Result<(), Box<dyn std::error::Error>> {
    let yaml = r#"
frame: Ned
time_step: 0.01
duration: 1.0
controller:
  scheme: VelocityXYPositionZControl
wind: !Constant
  speed: 3.0
  heading_deg: 45.0
trajectory:
  position_mode: Hover
  timing: ArrivalTimes
  waypoints:
    - position: [0.0, 0.0, -2.0]
      yaw: 0.0
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;

    let config = SimulationConfig::load(file.path())?;
    assert_eq!(config.controller.scheme, ControlScheme::VelocityXYPositionZControl);
    assert!(matches!(config.wind, WindConfig::Constant { .. }));
    assert_eq!(config.tick_count(), 100);

    let mut sim = Simulation::new(config)?;
    let log = sim.run()?;
    assert_eq!(log.len(), 101);
    Ok(())
}

#[test]
fn test_invalid_yaml_is_rejected_on_load() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"time_step: -0.01\n")?;
    assert!(matches!(
        SimulationConfig::load(file.path()),
        Err(SimError::Configuration(_))
    ));
    Ok(())
}
