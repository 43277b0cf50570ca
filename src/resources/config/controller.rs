use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{deg_to_rad, ConfigurationError};

/// Which axes the outer loop closes on position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlScheme {
    /// Position error feeds velocity on all three axes
    #[default]
    PositionControl,
    /// Horizontal velocity is tracked directly, altitude is held on position
    VelocityXYPositionZControl,
    /// Velocity is tracked directly on all three axes
    VelocityControl,
}

impl ControlScheme {
    /// Axes (x, y, z) on which the position loop is active.
    pub fn position_axes(&self) -> [bool; 3] {
        match self {
            ControlScheme::PositionControl => [true, true, true],
            ControlScheme::VelocityXYPositionZControl => [false, false, true],
            ControlScheme::VelocityControl => [false, false, false],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerGains {
    pub position_p: Vector3<f64>,
    pub velocity_p: Vector3<f64>,
    pub velocity_d: Vector3<f64>,
    pub velocity_i: Vector3<f64>,
    /// Attitude gains (roll, pitch, yaw)
    pub attitude_p: Vector3<f64>,
    pub rate_p: Vector3<f64>,
    pub rate_d: Vector3<f64>,
}

impl Default for ControllerGains {
    fn default() -> Self {
        Self {
            position_p: Vector3::new(1.0, 1.0, 1.0),
            velocity_p: Vector3::new(5.0, 5.0, 4.0),
            velocity_d: Vector3::new(0.5, 0.5, 0.5),
            velocity_i: Vector3::new(5.0, 5.0, 5.0),
            attitude_p: Vector3::new(8.0, 8.0, 1.5),
            rate_p: Vector3::new(1.5, 1.5, 1.0),
            rate_d: Vector3::new(0.04, 0.04, 0.1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerLimits {
    /// Per-axis velocity setpoint limit [m/s]
    pub max_velocity: Vector3<f64>,
    /// Norm limit on the horizontal velocity setpoint [m/s]
    pub max_horizontal_speed: f64,
    /// Saturate each axis independently instead of the horizontal norm
    pub saturate_per_axis: bool,
    /// Maximum tilt of the thrust vector from vertical [rad]
    pub max_tilt: f64,
    /// Body rate setpoint limit (p, q, r) [rad/s]
    pub max_rate: Vector3<f64>,
}

impl Default for ControllerLimits {
    fn default() -> Self {
        Self {
            max_velocity: Vector3::new(5.0, 5.0, 5.0),
            max_horizontal_speed: 5.0,
            saturate_per_axis: false,
            max_tilt: deg_to_rad(50.0),
            max_rate: Vector3::new(deg_to_rad(200.0), deg_to_rad(200.0), deg_to_rad(150.0)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub scheme: ControlScheme,
    pub gains: ControllerGains,
    pub limits: ControllerLimits,
    /// Integrate the velocity error into the thrust setpoint
    pub use_integral: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            scheme: ControlScheme::default(),
            gains: ControllerGains::default(),
            limits: ControllerLimits::default(),
            use_integral: true,
        }
    }
}

impl ControllerConfig {
    pub fn with_scheme(scheme: ControlScheme) -> Self {
        Self {
            scheme,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let gains = [
            ("position_p", &self.gains.position_p),
            ("velocity_p", &self.gains.velocity_p),
            ("velocity_d", &self.gains.velocity_d),
            ("velocity_i", &self.gains.velocity_i),
            ("attitude_p", &self.gains.attitude_p),
            ("rate_p", &self.gains.rate_p),
            ("rate_d", &self.gains.rate_d),
        ];
        for (name, gain) in gains {
            if gain.iter().any(|g| !g.is_finite() || *g < 0.0) {
                return Err(ConfigurationError::invalid(
                    name,
                    "gains must be finite and non-negative",
                ));
            }
        }

        if self.gains.attitude_p.x <= 0.0 || self.gains.attitude_p.y <= 0.0 {
            return Err(ConfigurationError::invalid(
                "attitude_p",
                "roll and pitch gains must be positive",
            ));
        }

        let limits = &self.limits;
        if limits.max_velocity.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigurationError::invalid(
                "max_velocity",
                "limits must be positive and finite",
            ));
        }
        if !(limits.max_horizontal_speed.is_finite() && limits.max_horizontal_speed > 0.0) {
            return Err(ConfigurationError::invalid(
                "max_horizontal_speed",
                "must be positive and finite",
            ));
        }
        if !(limits.max_tilt > 0.0 && limits.max_tilt < std::f64::consts::FRAC_PI_2) {
            return Err(ConfigurationError::invalid(
                "max_tilt",
                format!("must lie in (0, pi/2), got {}", limits.max_tilt),
            ));
        }
        if limits.max_rate.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigurationError::invalid(
                "max_rate",
                "limits must be positive and finite",
            ));
        }
        Ok(())
    }
}
