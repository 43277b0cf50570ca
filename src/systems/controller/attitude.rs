use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};

use crate::resources::WorldFrame;
use crate::utils::DIRECTION_EPSILON;

/// Full attitude whose body z axis realises `thrust` with heading `yaw`.
pub fn attitude_from_thrust(frame: WorldFrame, thrust: &Vector3<f64>, yaw: f64) -> UnitQuaternion<f64> {
    let body_z = frame.body_z_from_thrust(thrust);
    let heading_y = Vector3::new(-yaw.sin(), yaw.cos(), 0.0);

    let body_x = match heading_y.cross(&body_z).try_normalize(DIRECTION_EPSILON) {
        Some(x) => x,
        // Thrust lies in the horizontal plane; build the frame from the heading instead
        None => {
            let heading_x = Vector3::new(yaw.cos(), yaw.sin(), 0.0);
            body_z.cross(&heading_x).cross(&body_z).normalize()
        }
    };
    let body_y = body_z.cross(&body_x);

    let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[body_x, body_y, body_z]));
    UnitQuaternion::from_rotation_matrix(&rotation)
}

/// Shortest rotation taking the current body z axis onto the desired one,
/// expressed as a world-frame quaternion.
fn tilt_correction(current_z: &Vector3<f64>, desired_z: &Vector3<f64>) -> UnitQuaternion<f64> {
    let w = current_z.dot(desired_z) + (current_z.norm_squared() * desired_z.norm_squared()).sqrt();
    let axis = current_z.cross(desired_z);
    let raw = Quaternion::from_parts(w, axis);
    if raw.norm() > DIRECTION_EPSILON {
        UnitQuaternion::from_quaternion(raw)
    } else {
        // Opposite axes: any perpendicular rotation by pi will do
        let perpendicular = current_z
            .cross(&Vector3::x())
            .try_normalize(DIRECTION_EPSILON)
            .unwrap_or_else(Vector3::y);
        UnitQuaternion::from_quaternion(Quaternion::from_parts(0.0, perpendicular))
    }
}

/// Desired attitude blending the tilt-only correction with the full
/// attitude by `yaw_weight` in [0, 1].
pub fn blended_attitude(
    current: &UnitQuaternion<f64>,
    full: &UnitQuaternion<f64>,
    yaw_weight: f64,
) -> UnitQuaternion<f64> {
    let current_z = current * Vector3::z();
    let desired_z = full * Vector3::z();
    let reduced = tilt_correction(&current_z, &desired_z) * current;

    // Remaining rotation about the desired body z axis
    let mut mix = *(reduced.inverse() * full).quaternion();
    if mix.w < 0.0 {
        mix = -mix;
    }
    let angle_w = yaw_weight * mix.w.clamp(-1.0, 1.0).acos();
    let angle_k = yaw_weight * mix.k.clamp(-1.0, 1.0).asin();
    let yaw_part = Quaternion::new(angle_w.cos(), 0.0, 0.0, angle_k.sin());

    reduced * UnitQuaternion::from_quaternion(yaw_part)
}

/// Body-rate setpoint from the attitude error with yaw-rate feed-forward,
/// clamped to `max_rate`.
pub fn rate_setpoint(
    current: &UnitQuaternion<f64>,
    desired: &UnitQuaternion<f64>,
    gains: &Vector3<f64>,
    yaw_rate: f64,
    max_rate: &Vector3<f64>,
) -> Vector3<f64> {
    let error = current.inverse() * desired;
    let sign = if error.w < 0.0 { -1.0 } else { 1.0 };
    let mut rates = error.imag().component_mul(gains) * (2.0 * sign);

    // Yaw rate is about the world vertical axis
    let feed_forward = yaw_rate.clamp(-max_rate.z, max_rate.z);
    rates += (current.inverse() * Vector3::z()) * feed_forward;

    Vector3::new(
        rates.x.clamp(-max_rate.x, max_rate.x),
        rates.y.clamp(-max_rate.y, max_rate.y),
        rates.z.clamp(-max_rate.z, max_rate.z),
    )
}
