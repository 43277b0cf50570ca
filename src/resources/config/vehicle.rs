use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::{ConfigurationError, GRAVITY};

/// Rotation direction of a rotor, viewed from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinDirection {
    Clockwise,
    CounterClockwise,
}

impl SpinDirection {
    /// Sign of the reaction torque about the body up axis.
    pub fn reaction_sign(&self) -> f64 {
        match self {
            // A clockwise rotor pushes the airframe counter-clockwise
            SpinDirection::Clockwise => 1.0,
            SpinDirection::CounterClockwise => -1.0,
        }
    }
}

/// Placement of one rotor relative to the centre of mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorPlacement {
    /// Distance ahead of the centre of mass [m]
    pub forward: f64,
    /// Distance to the right of the centre of mass [m]
    pub right: f64,
    pub spin: SpinDirection,
}

/// Physical parameters of the quadrotor airframe and its motors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Total mass [kg]
    pub mass: f64,
    /// Gravitational acceleration magnitude [m/s^2]
    pub gravity: f64,
    /// Inertia tensor about the body axes [kg m^2]
    pub inertia: Matrix3<f64>,
    /// Rotor moment of inertia about its spin axis [kg m^2]
    pub rotor_inertia: f64,
    /// Include rotor gyroscopic precession in the body torques
    pub use_precession: bool,
    /// Quadratic translational drag coefficient [N/(m/s)^2]
    pub drag_coefficient: f64,
    /// Linear body-rate damping coefficient [N m/(rad/s)]
    pub angular_damping: f64,
    /// Thrust per squared rotor speed [N/(rad/s)^2]
    pub thrust_coefficient: f64,
    /// Reaction torque per squared rotor speed [N m/(rad/s)^2]
    pub torque_coefficient: f64,
    /// First-order motor time constant [s]
    pub motor_time_constant: f64,
    /// Rotor speed limits [rad/s]
    pub min_motor_speed: f64,
    pub max_motor_speed: f64,
    /// Rotor layout, numbered from the front-left motor going clockwise
    pub motors: [MotorPlacement; 4],
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            mass: 1.2,
            gravity: GRAVITY,
            inertia: Matrix3::from_diagonal(&Vector3::new(0.0123, 0.0123, 0.0224)),
            rotor_inertia: 2.7e-5,
            use_precession: false,
            drag_coefficient: 0.1,
            angular_damping: 0.0,
            thrust_coefficient: 1.076e-5,
            torque_coefficient: 1.632e-7,
            motor_time_constant: 0.015,
            min_motor_speed: 75.0,
            max_motor_speed: 925.0,
            motors: Self::quad_x(0.16, 0.16),
        }
    }
}

impl VehicleConfig {
    /// X layout with arm offsets `dx` (longitudinal) and `dy` (lateral).
    pub fn quad_x(dx: f64, dy: f64) -> [MotorPlacement; 4] {
        [
            MotorPlacement {
                forward: dx,
                right: -dy,
                spin: SpinDirection::Clockwise,
            },
            MotorPlacement {
                forward: dx,
                right: dy,
                spin: SpinDirection::CounterClockwise,
            },
            MotorPlacement {
                forward: -dx,
                right: dy,
                spin: SpinDirection::Clockwise,
            },
            MotorPlacement {
                forward: -dx,
                right: -dy,
                spin: SpinDirection::CounterClockwise,
            },
        ]
    }

    pub fn weight(&self) -> f64 {
        self.mass * self.gravity
    }

    /// Collective thrust with every motor at its lower speed limit [N]
    pub fn min_thrust(&self) -> f64 {
        4.0 * self.thrust_coefficient * self.min_motor_speed.powi(2)
    }

    /// Collective thrust with every motor at its upper speed limit [N]
    pub fn max_thrust(&self) -> f64 {
        4.0 * self.thrust_coefficient * self.max_motor_speed.powi(2)
    }

    /// Rotor speed at which the four motors together carry the weight [rad/s]
    pub fn hover_motor_speed(&self) -> f64 {
        (self.weight() / (4.0 * self.thrust_coefficient))
            .sqrt()
            .clamp(self.min_motor_speed, self.max_motor_speed)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let positive = [
            ("mass", self.mass),
            ("gravity", self.gravity),
            ("thrust_coefficient", self.thrust_coefficient),
            ("torque_coefficient", self.torque_coefficient),
            ("motor_time_constant", self.motor_time_constant),
            ("max_motor_speed", self.max_motor_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("must be positive and finite, got {}", value),
                ));
            }
        }

        let non_negative = [
            ("rotor_inertia", self.rotor_inertia),
            ("drag_coefficient", self.drag_coefficient),
            ("angular_damping", self.angular_damping),
            ("min_motor_speed", self.min_motor_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("must be non-negative and finite, got {}", value),
                ));
            }
        }

        if self.min_motor_speed >= self.max_motor_speed {
            return Err(ConfigurationError::invalid(
                "min_motor_speed",
                format!(
                    "must be below max_motor_speed ({} >= {})",
                    self.min_motor_speed, self.max_motor_speed
                ),
            ));
        }

        if self.inertia.iter().any(|v| !v.is_finite())
            || self.inertia.diagonal().iter().any(|&v| v <= 0.0)
            || self.inertia.try_inverse().is_none()
        {
            return Err(ConfigurationError::invalid(
                "inertia",
                "must be finite, invertible and have positive principal moments",
            ));
        }

        if self.weight() > self.max_thrust() {
            return Err(ConfigurationError::invalid(
                "max_motor_speed",
                format!(
                    "maximum thrust {:.3} N cannot carry the weight {:.3} N",
                    self.max_thrust(),
                    self.weight()
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_vehicle_is_valid() {
        let config = VehicleConfig::default();
        assert!(config.validate().is_ok());
        // Four rotors at hover speed carry the weight
        let hover = config.hover_motor_speed();
        assert_relative_eq!(
            4.0 * config.thrust_coefficient * hover * hover,
            config.weight(),
            epsilon = 1e-9
        );
        assert!(config.min_thrust() < config.weight());
        assert!(config.max_thrust() > config.weight());
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let config = VehicleConfig {
            mass: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidParameter { name: "mass", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_motor_limits() {
        let config = VehicleConfig {
            min_motor_speed: 1000.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_underpowered_vehicle() {
        let config = VehicleConfig {
            mass: 10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
