use nalgebra::Vector3;
use quadflyer::resources::{
    ControlScheme, ControllerConfig, GustConfig, PositionMode, SegmentTiming, SimulationConfig,
    TrajectoryConfig, Waypoint, WindConfig, WorldFrame, YawMode,
};

/// Position one metre above the origin in the given frame
pub fn hover_point(frame: WorldFrame) -> Vector3<f64> {
    frame.up()
}

/// Hover at `target` starting from `start`
pub fn create_hover_config(
    frame: WorldFrame,
    target: Vector3<f64>,
    start: Vector3<f64>,
    duration: f64,
) -> SimulationConfig {
    let mut config = SimulationConfig {
        frame,
        duration,
        trajectory: TrajectoryConfig::hover_at(target, 0.0),
        controller: ControllerConfig::with_scheme(ControlScheme::PositionControl),
        wind: WindConfig::None,
        ..Default::default()
    };
    config.initial.position = Some(start);
    config
}

/// Default gusty wind with a given seed
pub fn create_gust_wind(seed: u64) -> WindConfig {
    WindConfig::Gust(GustConfig {
        seed,
        ..Default::default()
    })
}

/// A single large waypoint jump that saturates the outer loops
pub fn create_step_config(frame: WorldFrame, distance: f64) -> SimulationConfig {
    SimulationConfig {
        frame,
        duration: 6.0,
        trajectory: TrajectoryConfig {
            position_mode: PositionMode::WaypointTimed,
            yaw_mode: YawMode::Timed,
            timing: SegmentTiming::ArrivalTimes,
            waypoints: vec![
                Waypoint::new(Vector3::zeros(), 0.0, 0.0),
                Waypoint::new(Vector3::new(distance, 0.0, 0.0), 0.0, 1.0),
            ],
            ..Default::default()
        },
        ..Default::default()
    }
}
