use nalgebra::{Matrix4, Vector3, Vector4};

use crate::resources::{VehicleConfig, WorldFrame};
use crate::utils::ConfigurationError;

/// Relative determinant below which the allocation is treated as singular
const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Fixed map between squared rotor speeds and the body wrench.
///
/// Rows are collective thrust along the body up axis followed by the three
/// body torque components; column `i` is motor `i`.
#[derive(Debug, Clone)]
pub struct ControlAllocation {
    matrix: Matrix4<f64>,
    inverse: Matrix4<f64>,
    min_speed_sq: f64,
    max_speed_sq: f64,
}

impl ControlAllocation {
    pub fn new(config: &VehicleConfig, frame: WorldFrame) -> Result<Self, ConfigurationError> {
        let up = frame.up();
        let mut matrix = Matrix4::zeros();
        for (i, motor) in config.motors.iter().enumerate() {
            let arm = frame.body_offset(motor.forward, motor.right);
            let lever = arm.cross(&up) * config.thrust_coefficient;
            let reaction = up * (motor.spin.reaction_sign() * config.torque_coefficient);
            matrix[(0, i)] = config.thrust_coefficient;
            matrix[(1, i)] = lever.x + reaction.x;
            matrix[(2, i)] = lever.y + reaction.y;
            matrix[(3, i)] = lever.z + reaction.z;
        }

        let scale: f64 = (0..4).map(|r| matrix.row(r).norm()).product();
        if matrix.determinant().abs() <= SINGULARITY_TOLERANCE * scale {
            return Err(ConfigurationError::SingularAllocation);
        }
        let inverse = matrix
            .try_inverse()
            .ok_or(ConfigurationError::SingularAllocation)?;

        Ok(Self {
            matrix,
            inverse,
            min_speed_sq: config.min_motor_speed.powi(2),
            max_speed_sq: config.max_motor_speed.powi(2),
        })
    }

    /// Collective thrust and body torque produced by the given rotor speeds.
    pub fn wrench(&self, speeds: &Vector4<f64>) -> (f64, Vector3<f64>) {
        let w = self.matrix * speeds.component_mul(speeds);
        (w[0], Vector3::new(w[1], w[2], w[3]))
    }

    /// Rotor speeds realising `thrust` and `torque`, with squared speeds
    /// clamped to the motor limits.
    pub fn speeds(&self, thrust: f64, torque: &Vector3<f64>) -> Vector4<f64> {
        let squared = self.inverse * Vector4::new(thrust, torque.x, torque.y, torque.z);
        squared.map(|w2| w2.clamp(self.min_speed_sq, self.max_speed_sq).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::SpinDirection;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip_inside_limits() {
        let config = VehicleConfig::default();
        for frame in [WorldFrame::Ned, WorldFrame::Enu] {
            let allocation = ControlAllocation::new(&config, frame).unwrap();
            let speeds = Vector4::new(500.0, 520.0, 480.0, 510.0);
            let (thrust, torque) = allocation.wrench(&speeds);
            let recovered = allocation.speeds(thrust, &torque);
            assert_relative_eq!(recovered, speeds, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_hover_thrust_gives_equal_speeds() {
        let config = VehicleConfig::default();
        let allocation = ControlAllocation::new(&config, WorldFrame::Ned).unwrap();
        let speeds = allocation.speeds(config.weight(), &Vector3::zeros());
        for i in 0..4 {
            assert_relative_eq!(speeds[i], config.hover_motor_speed(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_roll_torque_in_ned_speeds_up_left_motors() {
        let config = VehicleConfig::default();
        let allocation = ControlAllocation::new(&config, WorldFrame::Ned).unwrap();
        let speeds = allocation.speeds(config.weight(), &Vector3::new(0.05, 0.0, 0.0));
        // Motors 1 and 4 sit on the left
        assert!(speeds[0] > speeds[1]);
        assert!(speeds[3] > speeds[2]);
    }

    #[test]
    fn test_saturated_request_stays_within_limits() {
        let config = VehicleConfig::default();
        let allocation = ControlAllocation::new(&config, WorldFrame::Ned).unwrap();
        let speeds = allocation.speeds(1000.0, &Vector3::new(50.0, -50.0, 5.0));
        for w in speeds.iter() {
            assert!(*w >= config.min_motor_speed && *w <= config.max_motor_speed);
        }
    }

    #[test]
    fn test_same_spin_layout_is_singular() {
        let mut config = VehicleConfig::default();
        for motor in config.motors.iter_mut() {
            motor.spin = SpinDirection::Clockwise;
        }
        assert!(matches!(
            ControlAllocation::new(&config, WorldFrame::Ned),
            Err(ConfigurationError::SingularAllocation)
        ));
    }
}
