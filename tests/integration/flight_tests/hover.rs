use nalgebra::Vector3;
use quadflyer::{resources::WorldFrame, simulation::Simulation};

use crate::common::{
    assert_log_valid, assert_position_near, create_gust_wind, create_hover_config, hover_point,
};

fn converges_to_hover(frame: WorldFrame) {
    let target = hover_point(frame);
    let start = target + Vector3::new(0.3, -0.2, 0.3);
    let config = create_hover_config(frame, target, start, 11.0);
    let dt = config.time_step;

    let mut sim = Simulation::new(config).unwrap();
    let log = sim.run().unwrap();
    assert_log_valid(log, dt);

    // Settled after six seconds and stays there
    for record in log.records().iter().filter(|r| r.time >= 6.0) {
        assert_position_near(&record.state.position, &target, 0.05);
        assert!(record.euler.roll.abs() < 0.05);
        assert!(record.euler.pitch.abs() < 0.05);
    }
}

#[test]
fn test_hover_convergence_ned() {
    converges_to_hover(WorldFrame::Ned);
}

#[test]
fn test_hover_convergence_enu() {
    converges_to_hover(WorldFrame::Enu);
}

#[test]
fn test_hover_rejects_gusts() {
    let target = hover_point(WorldFrame::Ned);
    let mut config = create_hover_config(WorldFrame::Ned, target, target, 10.0);
    config.wind = create_gust_wind(11);

    let mut sim = Simulation::new(config).unwrap();
    let log = sim.run().unwrap();

    assert!(log.records().iter().any(|r| r.wind.norm() > 1.0));
    for record in log.records().iter().filter(|r| r.time >= 4.0) {
        assert_position_near(&record.state.position, &target, 0.3);
    }
}

#[test]
fn test_hover_from_rest_holds_altitude() {
    for frame in [WorldFrame::Ned, WorldFrame::Enu] {
        let target = hover_point(frame);
        let config = create_hover_config(frame, target, target, 3.0);
        let mut sim = Simulation::new(config).unwrap();
        sim.run().unwrap();
        assert_position_near(&sim.state().position, &target, 1e-6);
        assert!(frame.altitude(&sim.state().position) > 0.99);
    }
}
