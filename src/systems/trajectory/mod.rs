pub mod polynomial;
pub mod yaw;

use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{DesiredState, VehicleState};
use crate::resources::{PositionMode, TrajectoryConfig, YawMode};
use crate::utils::{lerp, ConfigurationError};

pub use polynomial::TrajectorySegment;
use polynomial::{solve_segments, solve_stopping_segments};
use yaw::{active_index, interpolated_yaw, segment_heading, timed_yaw, velocity_yaw};

/// Reference generator built once from the trajectory configuration.
///
/// Segment timing and polynomial coefficients are fixed at construction;
/// `desired_state` only evaluates them.
#[derive(Component, Debug, Clone)]
pub struct TrajectoryGenerator {
    position_mode: PositionMode,
    yaw_mode: YawMode,
    positions: Vec<Vector3<f64>>,
    yaws: Vec<f64>,
    times: Vec<f64>,
    segments: Vec<TrajectorySegment>,
}

impl TrajectoryGenerator {
    pub fn new(config: &TrajectoryConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let positions: Vec<Vector3<f64>> = config.waypoints.iter().map(|w| w.position).collect();
        let yaws: Vec<f64> = config.waypoints.iter().map(|w| w.yaw).collect();
        let times = config.arrival_times();

        let segments = match config.position_mode {
            PositionMode::MinimumDerivative {
                order,
                stop_at_waypoints,
            } => {
                let solve = if stop_at_waypoints {
                    solve_stopping_segments
                } else {
                    solve_segments
                };
                let segments = solve(&positions, &times, order.order(), &config.boundary)?;
                debug!(
                    "Solved {} minimum-{:?} segments over {:.2}s",
                    segments.len(),
                    order,
                    times.last().copied().unwrap_or(0.0)
                );
                segments
            }
            _ => Vec::new(),
        };

        Ok(Self {
            position_mode: config.position_mode,
            yaw_mode: config.yaw_mode,
            positions,
            yaws,
            times,
            segments,
        })
    }

    pub fn yaw_mode(&self) -> YawMode {
        self.yaw_mode
    }

    pub fn segments(&self) -> &[TrajectorySegment] {
        &self.segments
    }

    /// Arrival time of each waypoint [s]
    pub fn waypoint_times(&self) -> &[f64] {
        &self.times
    }

    /// Reference for time `t`.
    ///
    /// The reference is a function of `t` and setup data alone; the observed
    /// state never changes it.
    pub fn desired_state(&self, t: f64, _state: Option<&VehicleState>) -> DesiredState {
        let mut desired = self.position_reference(t);
        let (yaw, yaw_rate) = self.yaw_reference(t, &desired);
        desired.yaw = yaw;
        desired.yaw_rate = yaw_rate;
        desired
    }

    fn first_position(&self) -> Vector3<f64> {
        self.positions.first().copied().unwrap_or_else(Vector3::zeros)
    }

    fn position_reference(&self, t: f64) -> DesiredState {
        match self.position_mode {
            PositionMode::Hover => DesiredState::hold(self.first_position(), 0.0),
            PositionMode::WaypointTimed => {
                let i = active_index(&self.times, t);
                DesiredState::hold(self.positions[i], 0.0)
            }
            PositionMode::WaypointInterpolated => {
                let i = active_index(&self.times, t);
                if i + 1 < self.positions.len() && t >= self.times[i] {
                    let span = self.times[i + 1] - self.times[i];
                    let fraction = lerp(0.0, 1.0, (t - self.times[i]) / span);
                    let from = self.positions[i];
                    let to = self.positions[i + 1];
                    DesiredState {
                        position: from + (to - from) * fraction,
                        velocity: (to - from) / span,
                        ..Default::default()
                    }
                } else {
                    DesiredState::hold(self.positions[i], 0.0)
                }
            }
            PositionMode::MinimumDerivative { .. } => self.polynomial_reference(t),
        }
    }

    fn polynomial_reference(&self, t: f64) -> DesiredState {
        let (first, last) = match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return DesiredState::hold(self.first_position(), 0.0),
        };
        // Hold the end points outside the solved interval
        if t < first.start_time {
            return DesiredState::hold(first.evaluate(first.start_time, 0), 0.0);
        }
        if t > last.end_time() {
            return DesiredState::hold(last.evaluate(last.end_time(), 0), 0.0);
        }

        let index = self
            .segments
            .partition_point(|s| s.end_time() <= t)
            .min(self.segments.len() - 1);
        let segment = &self.segments[index];
        DesiredState {
            position: segment.evaluate(t, 0),
            velocity: segment.evaluate(t, 1),
            acceleration: segment.evaluate(t, 2),
            ..Default::default()
        }
    }

    fn yaw_reference(&self, t: f64, desired: &DesiredState) -> (f64, f64) {
        match self.yaw_mode {
            YawMode::None => (self.yaws.first().copied().unwrap_or(0.0), 0.0),
            YawMode::Timed => timed_yaw(&self.yaws, &self.times, t),
            YawMode::Interpolated => interpolated_yaw(&self.yaws, &self.times, t),
            // Slow or stationary references keep the heading of their leg
            YawMode::FollowVelocity => velocity_yaw(&desired.velocity, &desired.acceleration)
                .or_else(|| {
                    segment_heading(&self.positions, &self.times, t).map(|yaw| (yaw, 0.0))
                })
                .unwrap_or_else(|| timed_yaw(&self.yaws, &self.times, t)),
        }
    }
}
