use nalgebra::Vector3;
use quadflyer::{
    plugins::SimulationStatus,
    resources::{SimulationConfig, WorldFrame},
    simulation::Simulation,
    utils::{DynamicsError, SimError},
};

use crate::common::{create_hover_config, hover_point, TestApp};

/// Hover setup whose first integration step overflows
fn diverging_config() -> SimulationConfig {
    let target = hover_point(WorldFrame::Ned);
    let mut config = create_hover_config(WorldFrame::Ned, target, target, 1.0);
    config.initial.angular_velocity = Vector3::new(1e200, 1e200, 0.0);
    config
}

#[test]
fn test_coordinator_halts_on_dynamics_error() {
    let mut sim = Simulation::new(diverging_config()).unwrap();
    let initial = *sim.state();

    let err = sim.run().unwrap_err();
    assert!(matches!(
        err,
        SimError::Halted {
            last_valid_tick: 0,
            source: DynamicsError::NonFiniteState { .. },
            ..
        }
    ));

    // Only the initial record, and the vehicle keeps its last valid state
    assert_eq!(sim.tick(), 0);
    assert_eq!(sim.log().len(), 1);
    assert_eq!(sim.state(), &initial);
    assert!(!sim.is_finished());
}

#[test]
fn test_plugin_halts_on_dynamics_error() {
    let mut app = TestApp::new(diverging_config());
    app.run_to_completion();

    match app.status() {
        SimulationStatus::Halted {
            last_valid_tick,
            last_valid_time,
            reason,
        } => {
            assert_eq!(*last_valid_tick, 0);
            assert_eq!(*last_valid_time, 0.0);
            assert!(!reason.is_empty());
        }
        other => panic!("expected a halted run, got {:?}", other),
    }
    assert_eq!(app.clock().tick, 0);
    assert_eq!(app.log().len(), 1);

    // Nothing moves once halted
    app.run_ticks(3);
    assert_eq!(app.clock().tick, 0);
    assert_eq!(app.log().len(), 1);
}
