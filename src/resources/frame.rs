use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::DIRECTION_EPSILON;

/// World-frame convention shared by every component that reads the gravity
/// direction or the thrust axis.
///
/// Both conventions use a body frame with x pointing forward. `Ned` uses
/// north-east-down world axes with body y to the right and z down; `Enu` uses
/// east-north-up world axes with body y to the left and z up.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorldFrame {
    #[default]
    Ned,
    Enu,
}

impl WorldFrame {
    /// Unit vector pointing up. Valid for both the world and the level body frame.
    pub fn up(&self) -> Vector3<f64> {
        match self {
            WorldFrame::Ned => Vector3::new(0.0, 0.0, -1.0),
            WorldFrame::Enu => Vector3::new(0.0, 0.0, 1.0),
        }
    }

    /// Gravitational acceleration vector in world axes.
    pub fn gravity(&self, g: f64) -> Vector3<f64> {
        -self.up() * g
    }

    /// Height above the world origin.
    pub fn altitude(&self, position: &Vector3<f64>) -> f64 {
        position.dot(&self.up())
    }

    /// Body-frame offset of a point `forward` metres ahead and `right` metres
    /// to the right of the centre of mass.
    pub fn body_offset(&self, forward: f64, right: f64) -> Vector3<f64> {
        match self {
            WorldFrame::Ned => Vector3::new(forward, right, 0.0),
            WorldFrame::Enu => Vector3::new(forward, -right, 0.0),
        }
    }

    /// Bounds on the vertical world component of a thrust vector whose
    /// magnitude lies in `[min_thrust, max_thrust]` and points up.
    pub fn vertical_thrust_bounds(&self, min_thrust: f64, max_thrust: f64) -> (f64, f64) {
        match self {
            WorldFrame::Ned => (-max_thrust, -min_thrust),
            WorldFrame::Enu => (min_thrust, max_thrust),
        }
    }

    /// Desired body z axis (world axes) that aligns the rotor thrust with `thrust`.
    pub fn body_z_from_thrust(&self, thrust: &Vector3<f64>) -> Vector3<f64> {
        let direction = thrust
            .try_normalize(DIRECTION_EPSILON)
            .unwrap_or_else(|| self.up());
        match self {
            WorldFrame::Ned => -direction,
            WorldFrame::Enu => direction,
        }
    }
}
