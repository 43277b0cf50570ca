use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{deg_to_rad, ConfigurationError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vector3<f64>,
    /// Heading at the waypoint [rad]
    pub yaw: f64,
    /// Arrival time [s], only read under `SegmentTiming::ArrivalTimes`
    #[serde(default)]
    pub time: f64,
}

impl Waypoint {
    pub fn new(position: Vector3<f64>, yaw: f64, time: f64) -> Self {
        Self {
            position,
            yaw,
            time,
        }
    }
}

/// Derivative minimised by the polynomial trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivativeOrder {
    Velocity,
    Acceleration,
    Jerk,
    Snap,
}

impl DerivativeOrder {
    pub fn order(&self) -> usize {
        match self {
            DerivativeOrder::Velocity => 1,
            DerivativeOrder::Acceleration => 2,
            DerivativeOrder::Jerk => 3,
            DerivativeOrder::Snap => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionMode {
    Hover,
    WaypointTimed,
    WaypointInterpolated,
    MinimumDerivative {
        order: DerivativeOrder,
        /// Bring the vehicle to rest at every waypoint
        #[serde(default)]
        stop_at_waypoints: bool,
    },
}

impl PositionMode {
    pub fn name(&self) -> &'static str {
        match self {
            PositionMode::Hover => "Hover",
            PositionMode::WaypointTimed => "WaypointTimed",
            PositionMode::WaypointInterpolated => "WaypointInterpolated",
            PositionMode::MinimumDerivative { .. } => "MinimumDerivative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YawMode {
    /// Hold the first waypoint heading with the yaw loop disabled
    None,
    Timed,
    #[default]
    Interpolated,
    FollowVelocity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentTiming {
    /// Use each waypoint's own `time`
    ArrivalTimes,
    /// Derive durations from the straight-line distance at this speed [m/s]
    AverageSpeed { speed: f64 },
}

/// Explicit endpoint derivatives for polynomial trajectories.
///
/// Entry `k` holds derivative `k + 1` (velocity, acceleration, ...); anything
/// not given is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConditions {
    pub start: Vec<Vector3<f64>>,
    pub end: Vec<Vector3<f64>>,
}

impl BoundaryConditions {
    pub fn start_derivative(&self, k: usize) -> Vector3<f64> {
        Self::lookup(&self.start, k)
    }

    pub fn end_derivative(&self, k: usize) -> Vector3<f64> {
        Self::lookup(&self.end, k)
    }

    fn lookup(values: &[Vector3<f64>], k: usize) -> Vector3<f64> {
        k.checked_sub(1)
            .and_then(|i| values.get(i))
            .copied()
            .unwrap_or_else(Vector3::zeros)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    pub position_mode: PositionMode,
    #[serde(default)]
    pub yaw_mode: YawMode,
    pub timing: SegmentTiming,
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub boundary: BoundaryConditions,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        let positions = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 1.0),
            Vector3::new(-2.0, 3.0, -3.0),
            Vector3::new(-2.0, -1.0, -3.0),
            Vector3::new(3.0, -2.0, 1.0),
            Vector3::new(0.0, 0.0, 0.0),
        ];
        let yaws = [0.0, 20.0, -90.0, 120.0, 45.0, 0.0];
        let waypoints = positions
            .iter()
            .zip(yaws.iter())
            .enumerate()
            .map(|(i, (position, yaw))| Waypoint::new(*position, deg_to_rad(*yaw), 3.0 * i as f64))
            .collect();

        Self {
            position_mode: PositionMode::MinimumDerivative {
                order: DerivativeOrder::Snap,
                stop_at_waypoints: false,
            },
            yaw_mode: YawMode::Interpolated,
            timing: SegmentTiming::ArrivalTimes,
            waypoints,
            boundary: BoundaryConditions::default(),
        }
    }
}

impl TrajectoryConfig {
    pub fn hover_at(position: Vector3<f64>, yaw: f64) -> Self {
        Self {
            position_mode: PositionMode::Hover,
            yaw_mode: YawMode::Timed,
            timing: SegmentTiming::ArrivalTimes,
            waypoints: vec![Waypoint::new(position, yaw, 0.0)],
            boundary: BoundaryConditions::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let count = self.waypoints.len();
        match self.position_mode {
            PositionMode::MinimumDerivative { .. } if count < 2 => {
                return Err(ConfigurationError::NotEnoughWaypoints {
                    mode: self.position_mode.name(),
                    required: 2,
                    found: count,
                });
            }
            PositionMode::WaypointTimed | PositionMode::WaypointInterpolated if count == 0 => {
                return Err(ConfigurationError::NotEnoughWaypoints {
                    mode: self.position_mode.name(),
                    required: 1,
                    found: 0,
                });
            }
            _ => {}
        }

        for waypoint in &self.waypoints {
            if waypoint.position.iter().any(|v| !v.is_finite()) || !waypoint.yaw.is_finite() {
                return Err(ConfigurationError::invalid(
                    "waypoints",
                    "positions and yaw angles must be finite",
                ));
            }
        }

        match self.timing {
            SegmentTiming::ArrivalTimes => {
                if let Some(waypoint) = self.waypoints.iter().find(|w| !w.time.is_finite()) {
                    return Err(ConfigurationError::invalid(
                        "time",
                        format!("arrival times must be finite, got {}", waypoint.time),
                    ));
                }
                for (index, pair) in self.waypoints.windows(2).enumerate() {
                    if pair[1].time <= pair[0].time {
                        return Err(ConfigurationError::NonIncreasingTimes {
                            index: index + 1,
                            time: pair[1].time,
                        });
                    }
                }
            }
            SegmentTiming::AverageSpeed { speed } => {
                if !(speed.is_finite() && speed > 0.0) {
                    return Err(ConfigurationError::invalid(
                        "speed",
                        format!("average speed must be positive, got {}", speed),
                    ));
                }
                for pair in self.waypoints.windows(2) {
                    if (pair[1].position - pair[0].position).norm() <= f64::EPSILON {
                        return Err(ConfigurationError::invalid(
                            "waypoints",
                            "consecutive waypoints coincide, segment duration would be zero",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Arrival time of every waypoint, relative to the start of the run.
    pub fn arrival_times(&self) -> Vec<f64> {
        match self.timing {
            SegmentTiming::ArrivalTimes => self.waypoints.iter().map(|w| w.time).collect(),
            SegmentTiming::AverageSpeed { speed } => {
                let mut elapsed = 0.0;
                let mut times = Vec::with_capacity(self.waypoints.len());
                for (i, waypoint) in self.waypoints.iter().enumerate() {
                    if i > 0 {
                        elapsed += (waypoint.position - self.waypoints[i - 1].position).norm() / speed;
                    }
                    times.push(elapsed);
                }
                times
            }
        }
    }
}
