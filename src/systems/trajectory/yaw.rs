use nalgebra::Vector3;

use crate::utils::wrap_angle;

/// Horizontal speed below which the velocity heading is undefined [m/s]
const MIN_HEADING_SPEED: f64 = 1e-3;
/// Horizontal leg length below which a leg has no heading [m]
const MIN_HEADING_DISTANCE: f64 = 0.05;

/// Index of the last waypoint whose arrival time has passed.
pub fn active_index(times: &[f64], t: f64) -> usize {
    times.partition_point(|&ti| ti <= t).saturating_sub(1)
}

pub fn timed_yaw(yaws: &[f64], times: &[f64], t: f64) -> (f64, f64) {
    match yaws.get(active_index(times, t)) {
        Some(&yaw) => (yaw, 0.0),
        None => (0.0, 0.0),
    }
}

/// Yaw interpolated along the shorter arc between consecutive waypoints.
pub fn interpolated_yaw(yaws: &[f64], times: &[f64], t: f64) -> (f64, f64) {
    let i = active_index(times, t);
    match (yaws.get(i), yaws.get(i + 1)) {
        (Some(&from), Some(&to)) if t >= times[i] => {
            let span = times[i + 1] - times[i];
            let delta = wrap_angle(to - from);
            let fraction = (t - times[i]) / span;
            (wrap_angle(from + delta * fraction), delta / span)
        }
        (Some(&yaw), _) => (yaw, 0.0),
        _ => (0.0, 0.0),
    }
}

/// Heading along the horizontal velocity, with the analytic turn rate.
///
/// Returns `None` when the horizontal velocity is too small to define one.
pub fn velocity_yaw(velocity: &Vector3<f64>, acceleration: &Vector3<f64>) -> Option<(f64, f64)> {
    let speed_sq = velocity.x * velocity.x + velocity.y * velocity.y;
    if speed_sq < MIN_HEADING_SPEED * MIN_HEADING_SPEED {
        return None;
    }
    let yaw = velocity.y.atan2(velocity.x);
    let rate = (velocity.x * acceleration.y - velocity.y * acceleration.x) / speed_sq;
    Some((yaw, rate))
}

/// Heading of the waypoint leg active at `t`.
///
/// Legs without horizontal extent take the heading of the closest earlier
/// leg that has one, then of the first later one. `None` when no leg moves
/// horizontally.
pub fn segment_heading(positions: &[Vector3<f64>], times: &[f64], t: f64) -> Option<f64> {
    let legs = positions.len().checked_sub(1)?;
    let active = active_index(times, t).min(legs.saturating_sub(1));
    let heading = |i: usize| {
        let leg = positions[i + 1] - positions[i];
        (leg.x.hypot(leg.y) > MIN_HEADING_DISTANCE).then(|| leg.y.atan2(leg.x))
    };
    (0..legs.min(active + 1))
        .rev()
        .chain(active + 1..legs)
        .find_map(heading)
}
