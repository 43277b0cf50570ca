use nalgebra::Vector3;
use quadflyer::{
    resources::{
        ControlScheme, DerivativeOrder, PositionMode, SimulationConfig, TrajectoryConfig,
        WorldFrame, YawMode,
    },
    simulation::Simulation,
    utils::{axis_deviation, deg_to_rad, wrap_angle},
};

use crate::common::{assert_log_valid, assert_position_near, create_step_config};

#[test]
fn test_minimum_snap_tracking() {
    let config = SimulationConfig::default();
    let dt = config.time_step;
    let end = config.trajectory.waypoints.last().unwrap().position;

    let mut sim = Simulation::new(config).unwrap();
    let log = sim.run().unwrap();
    assert_log_valid(log, dt);
    assert_eq!(log.len(), 3201);

    let worst = log
        .records()
        .iter()
        .map(|r| (r.state.position - r.desired.position).norm())
        .fold(0.0, f64::max);
    assert!(worst < 1.5, "worst tracking error {:.3} m", worst);

    let last = log.last().unwrap();
    assert_position_near(&last.state.position, &end, 0.3);
}

#[test]
fn test_yaw_follows_interpolated_reference() {
    let config = SimulationConfig::default();
    let mut sim = Simulation::new(config).unwrap();
    let log = sim.run().unwrap();

    // Yaw loop is slower than tilt but must settle at the final heading
    let last = log.last().unwrap();
    assert!(wrap_angle(last.euler.yaw - last.desired.yaw).abs() < deg_to_rad(5.0));
}

#[test]
fn test_step_input_respects_tilt_limit() {
    for frame in [WorldFrame::Ned, WorldFrame::Enu] {
        let config = create_step_config(frame, 10.0);
        let max_tilt = config.controller.limits.max_tilt;
        let mut sim = Simulation::new(config).unwrap();
        let log = sim.run().unwrap();

        // Body and world axes share the same up convention
        let up = frame.up();
        let worst = log
            .records()
            .iter()
            .map(|r| axis_deviation(&r.state.attitude, &up, &up))
            .fold(0.0, f64::max);
        assert!(worst < max_tilt + deg_to_rad(10.0));
        assert!(worst > deg_to_rad(20.0), "step should tilt the vehicle");

        // Heading towards +x the whole way
        assert!(log.last().unwrap().state.position.x > 5.0);
    }
}

#[test]
fn test_velocity_xy_scheme_holds_altitude() {
    let mut config = SimulationConfig {
        duration: 4.0,
        trajectory: TrajectoryConfig {
            position_mode: PositionMode::MinimumDerivative {
                order: DerivativeOrder::Jerk,
                stop_at_waypoints: true,
            },
            yaw_mode: YawMode::FollowVelocity,
            ..create_step_config(WorldFrame::Ned, 2.0).trajectory
        },
        ..Default::default()
    };
    config.trajectory.waypoints[1].time = 3.0;
    config.controller.scheme = ControlScheme::VelocityXYPositionZControl;

    let mut sim = Simulation::new(config).unwrap();
    let log = sim.run().unwrap();

    for record in log.records() {
        assert!(record.state.position.z.abs() < 0.1);
    }
    // Horizontal velocity is tracked, so the vehicle ends up roughly on target
    assert_position_near(
        &log.last().unwrap().state.position,
        &Vector3::new(2.0, 0.0, 0.0),
        0.5,
    );
}
