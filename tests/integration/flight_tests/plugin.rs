use pretty_assertions::assert_eq;
use quadflyer::{
    plugins::SimulationStatus,
    resources::{SimulationConfig, WorldFrame},
    simulation::Simulation,
};

use crate::common::{assert_log_valid, create_gust_wind, TestApp};

fn gusty_config(frame: WorldFrame) -> SimulationConfig {
    SimulationConfig {
        frame,
        duration: 3.0,
        wind: create_gust_wind(21),
        ..Default::default()
    }
}

#[test]
fn test_plugin_matches_coordinator() {
    for frame in [WorldFrame::Ned, WorldFrame::Enu] {
        let mut app = TestApp::new(gusty_config(frame));
        app.run_to_completion();
        assert_eq!(*app.status(), SimulationStatus::Finished);

        let mut sim = Simulation::new(gusty_config(frame)).unwrap();
        sim.run().unwrap();

        assert_eq!(app.log(), sim.log());
    }
}

#[test]
fn test_plugin_stops_at_end_tick() {
    let config = gusty_config(WorldFrame::Ned);
    let dt = config.time_step;
    let mut app = TestApp::new(config);

    app.run_ticks(10);
    assert_eq!(app.clock().tick, 10);
    assert_eq!(*app.status(), SimulationStatus::Running);

    app.run_to_completion();
    let end_tick = app.clock().end_tick;
    assert_eq!(app.clock().tick, end_tick);

    // Further schedule runs are no-ops once finished
    app.run_ticks(5);
    assert_eq!(app.clock().tick, end_tick);
    assert_eq!(app.log().len(), end_tick + 1);
    assert_log_valid(app.log(), dt);

    let last = app.log().last().unwrap().state;
    assert_eq!(app.quadcopter().unwrap().state(), &last);
}
