use bevy::prelude::*;
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// Rotor speed setpoints produced by the controller for one tick [rad/s]
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandVector {
    pub speeds: Vector4<f64>,
}

impl CommandVector {
    pub fn new(speeds: Vector4<f64>) -> Self {
        Self { speeds }
    }

    pub fn uniform(speed: f64) -> Self {
        Self {
            speeds: Vector4::repeat(speed),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.speeds.iter().all(|v| v.is_finite())
    }
}

/// Per-motor speeds and the loads they produce
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorState {
    /// Last accepted setpoint, clamped to the motor limits [rad/s]
    pub commanded: Vector4<f64>,
    /// Rotor speed after the first-order lag [rad/s]
    pub actual: Vector4<f64>,
    /// Thrust along the body up axis [N]
    pub thrust: Vector4<f64>,
    /// Signed reaction torque about the body up axis [N m]
    pub torque: Vector4<f64>,
}
