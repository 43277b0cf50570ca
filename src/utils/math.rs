use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

/// Wrap an angle to (-pi, pi]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Coefficient of the k-th derivative of tau^j, i.e. j! / (j - k)!
pub fn falling_factorial(j: usize, k: usize) -> f64 {
    if k > j {
        return 0.0;
    }
    ((j - k + 1)..=j).fold(1.0, |acc, v| acc * v as f64)
}

/// Time derivative of an attitude quaternion for a body-frame angular velocity.
///
/// q_dot = 0.5 * q ⊗ [0, omega]
pub fn quaternion_rate(attitude: &Quaternion<f64>, angular_velocity: &Vector3<f64>) -> Quaternion<f64> {
    attitude * Quaternion::from_imag(*angular_velocity) * 0.5
}

/// Angle between the body axis `axis` (expressed in body frame) and the world
/// vector `reference` after rotating by `attitude`.
pub fn axis_deviation(
    attitude: &UnitQuaternion<f64>,
    axis: &Vector3<f64>,
    reference: &Vector3<f64>,
) -> f64 {
    let rotated = attitude * axis;
    let cos = rotated.dot(reference) / (rotated.norm() * reference.norm());
    cos.clamp(-1.0, 1.0).acos()
}
