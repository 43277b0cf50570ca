use nalgebra::Vector3;
use pretty_assertions::assert_eq;
use quadflyer::{
    resources::{
        DerivativeOrder, PositionMode, SimulationConfig, TrajectoryConfig, Waypoint, YawMode,
    },
    simulation::{run_sweep, FlightLog, Simulation},
    utils::{ConfigurationError, SimError},
};

use crate::common::create_gust_wind;

fn gusty_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        duration: 4.0,
        wind: create_gust_wind(seed),
        ..Default::default()
    }
}

fn run(config: SimulationConfig) -> FlightLog {
    let mut sim = Simulation::new(config).unwrap();
    sim.run().unwrap();
    sim.into_log()
}

#[test]
fn test_identical_configs_give_identical_logs() {
    let first = run(gusty_config(3));
    let second = run(gusty_config(3));
    assert_eq!(first, second);
}

#[test]
fn test_gust_seed_changes_the_run() {
    let first = run(gusty_config(3));
    let second = run(gusty_config(4));
    assert!(first != second);
}

#[test]
fn test_sweep_matches_sequential_runs() {
    let configs: Vec<SimulationConfig> = (0..4).map(gusty_config).collect();
    let sequential: Vec<FlightLog> = configs.iter().cloned().map(run).collect();

    let parallel: Vec<FlightLog> = run_sweep(configs)
        .into_iter()
        .map(|result| result.unwrap())
        .collect();

    assert_eq!(parallel.len(), sequential.len());
    for (a, b) in parallel.iter().zip(sequential.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_single_waypoint_minimum_jerk_fails_before_first_tick() {
    let config = SimulationConfig {
        trajectory: TrajectoryConfig {
            position_mode: PositionMode::MinimumDerivative {
                order: DerivativeOrder::Jerk,
                stop_at_waypoints: false,
            },
            yaw_mode: YawMode::Timed,
            waypoints: vec![Waypoint::new(Vector3::new(1.0, 1.0, -1.0), 0.0, 0.0)],
            ..Default::default()
        },
        ..Default::default()
    };

    let err = Simulation::new(config.clone()).unwrap_err();
    assert!(matches!(err, ConfigurationError::NotEnoughWaypoints { found: 1, .. }));

    let results = run_sweep(vec![config]);
    assert!(matches!(
        results[0],
        Err(SimError::Configuration(ConfigurationError::NotEnoughWaypoints { .. }))
    ));
}
