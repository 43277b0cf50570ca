use bevy::prelude::Resource;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ControllerConfig, TrajectoryConfig, VehicleConfig, WindConfig};
use crate::resources::WorldFrame;
use crate::utils::{ConfigurationError, SimError, DEFAULT_DURATION, DEFAULT_TIME_STEP};

/// Vehicle state at tick zero.
///
/// Unset position and yaw fall back to the first waypoint of the trajectory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    pub position: Option<Vector3<f64>>,
    pub velocity: Vector3<f64>,
    pub yaw: Option<f64>,
    pub angular_velocity: Vector3<f64>,
}

/// Everything a run needs, fixed before the first tick.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub frame: WorldFrame,
    /// Fixed tick length [s]
    pub time_step: f64,
    /// Simulated duration [s]
    pub duration: f64,
    pub vehicle: VehicleConfig,
    pub controller: ControllerConfig,
    pub trajectory: TrajectoryConfig,
    pub wind: WindConfig,
    pub initial: InitialConditions,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame: WorldFrame::Ned,
            time_step: DEFAULT_TIME_STEP,
            duration: DEFAULT_DURATION,
            vehicle: VehicleConfig::default(),
            controller: ControllerConfig::default(),
            trajectory: TrajectoryConfig::default(),
            wind: WindConfig::None,
            initial: InitialConditions::default(),
        }
    }
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let file = std::fs::File::open(path)?;
        let config: SimulationConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigurationError::invalid(
                "time_step",
                format!("must be positive and finite, got {}", self.time_step),
            ));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ConfigurationError::invalid(
                "duration",
                format!("must be non-negative and finite, got {}", self.duration),
            ));
        }
        let initial = &self.initial;
        let finite = initial.position.map_or(true, |p| p.iter().all(|v| v.is_finite()))
            && initial.yaw.map_or(true, f64::is_finite)
            && initial.velocity.iter().all(|v| v.is_finite())
            && initial.angular_velocity.iter().all(|v| v.is_finite());
        if !finite {
            return Err(ConfigurationError::invalid(
                "initial",
                "initial conditions must be finite",
            ));
        }

        self.vehicle.validate()?;
        self.controller.validate()?;
        self.trajectory.validate()?;
        self.wind.validate()
    }

    /// Number of ticks covering `duration`.
    pub fn tick_count(&self) -> usize {
        (self.duration / self.time_step).round() as usize
    }

    pub fn initial_position(&self) -> Vector3<f64> {
        self.initial.position.unwrap_or_else(|| {
            self.trajectory
                .waypoints
                .first()
                .map(|w| w.position)
                .unwrap_or_else(Vector3::zeros)
        })
    }

    pub fn initial_attitude(&self) -> UnitQuaternion<f64> {
        let yaw = self.initial.yaw.unwrap_or_else(|| {
            self.trajectory
                .waypoints
                .first()
                .map(|w| w.yaw)
                .unwrap_or(0.0)
        });
        UnitQuaternion::from_euler_angles(0.0, 0.0, yaw)
    }
}
