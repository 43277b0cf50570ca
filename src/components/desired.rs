use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Reference the controller tracks at one instant
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesiredState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
    pub yaw: f64,
    pub yaw_rate: f64,
}

impl DesiredState {
    pub fn hold(position: Vector3<f64>, yaw: f64) -> Self {
        Self {
            position,
            yaw,
            ..Default::default()
        }
    }
}
