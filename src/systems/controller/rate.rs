use nalgebra::Vector3;

use crate::components::VehicleState;

/// Body torque from the rate error, with the derivative taken on the
/// measured angular acceleration.
pub fn rate_torque(
    p_gain: &Vector3<f64>,
    d_gain: &Vector3<f64>,
    rate_setpoint: &Vector3<f64>,
    state: &VehicleState,
) -> Vector3<f64> {
    p_gain.component_mul(&(rate_setpoint - state.angular_velocity))
        - d_gain.component_mul(&state.angular_acceleration)
}
