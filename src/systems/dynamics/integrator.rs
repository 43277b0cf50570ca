use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::components::VehicleState;

/// Integrable part of the vehicle state.
///
/// The attitude is carried as a raw quaternion so the RK4 stages can combine
/// it linearly; it is normalised once the step completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub attitude: Quaternion<f64>,
    pub angular_velocity: Vector3<f64>,
}

/// Time derivative of a `BodyState`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRates {
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
    pub attitude_rate: Quaternion<f64>,
    pub angular_acceleration: Vector3<f64>,
}

impl BodyState {
    pub fn from_vehicle(state: &VehicleState) -> Self {
        Self {
            position: state.position,
            velocity: state.velocity,
            attitude: *state.attitude.quaternion(),
            angular_velocity: state.angular_velocity,
        }
    }

    /// Attitude as a rotation, renormalising the stage quaternion.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::new_normalize(self.attitude)
    }

    fn advance(&self, rates: &BodyRates, h: f64) -> Self {
        Self {
            position: self.position + rates.velocity * h,
            velocity: self.velocity + rates.acceleration * h,
            attitude: self.attitude + rates.attitude_rate * h,
            angular_velocity: self.angular_velocity + rates.angular_acceleration * h,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.attitude.coords.iter().all(|v| v.is_finite())
            && self.angular_velocity.iter().all(|v| v.is_finite())
    }
}

/// Classical fourth-order Runge-Kutta step of length `dt`.
pub fn rk4_step<F>(state: &BodyState, dt: f64, derivatives: F) -> BodyState
where
    F: Fn(&BodyState) -> BodyRates,
{
    let k1 = derivatives(state);
    let k2 = derivatives(&state.advance(&k1, dt / 2.0));
    let k3 = derivatives(&state.advance(&k2, dt / 2.0));
    let k4 = derivatives(&state.advance(&k3, dt));

    let sixth = dt / 6.0;
    BodyState {
        position: state.position
            + (k1.velocity + k2.velocity * 2.0 + k3.velocity * 2.0 + k4.velocity) * sixth,
        velocity: state.velocity
            + (k1.acceleration + k2.acceleration * 2.0 + k3.acceleration * 2.0 + k4.acceleration)
                * sixth,
        attitude: state.attitude
            + (k1.attitude_rate
                + k2.attitude_rate * 2.0
                + k3.attitude_rate * 2.0
                + k4.attitude_rate)
                * sixth,
        angular_velocity: state.angular_velocity
            + (k1.angular_acceleration
                + k2.angular_acceleration * 2.0
                + k3.angular_acceleration * 2.0
                + k4.angular_acceleration)
                * sixth,
    }
}
