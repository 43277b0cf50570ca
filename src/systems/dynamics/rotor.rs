use nalgebra::Vector4;

use crate::components::{CommandVector, MotorState};
use crate::resources::VehicleConfig;
use crate::utils::MIN_TIME_CONSTANT;

/// Clamp a speed setpoint vector to the motor limits.
pub fn clamp_speeds(speeds: &Vector4<f64>, config: &VehicleConfig) -> Vector4<f64> {
    speeds.map(|w| w.clamp(config.min_motor_speed, config.max_motor_speed))
}

/// Motor state with every rotor settled at `speed`.
pub fn settled_motors(speed: f64, config: &VehicleConfig) -> MotorState {
    let speeds = clamp_speeds(&Vector4::repeat(speed), config);
    let mut motors = MotorState {
        commanded: speeds,
        actual: speeds,
        ..Default::default()
    };
    update_loads(&mut motors, config);
    motors
}

/// Advance every rotor toward its clamped setpoint with an exact first-order lag.
///
/// w(t+dt) = w_cmd + (w(t) - w_cmd) * exp(-dt / tau)
pub fn relax_motors(motors: &mut MotorState, command: &CommandVector, config: &VehicleConfig, dt: f64) {
    motors.commanded = clamp_speeds(&command.speeds, config);

    if config.motor_time_constant > MIN_TIME_CONSTANT {
        let decay = (-dt / config.motor_time_constant).exp();
        motors.actual = motors.commanded + (motors.actual - motors.commanded) * decay;
    } else {
        motors.actual = motors.commanded;
    }
    motors.actual = clamp_speeds(&motors.actual, config);

    update_loads(motors, config);
}

/// Thrust and signed reaction torque of each rotor at its actual speed.
pub fn update_loads(motors: &mut MotorState, config: &VehicleConfig) {
    for i in 0..4 {
        let speed_sq = motors.actual[i] * motors.actual[i];
        motors.thrust[i] = config.thrust_coefficient * speed_sq;
        motors.torque[i] =
            config.motors[i].spin.reaction_sign() * config.torque_coefficient * speed_sq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_command_is_clamped() {
        let config = VehicleConfig::default();
        let mut motors = settled_motors(500.0, &config);
        let command = CommandVector::new(Vector4::new(0.0, 2000.0, 500.0, 500.0));
        relax_motors(&mut motors, &command, &config, 0.005);

        assert_eq!(motors.commanded[0], config.min_motor_speed);
        assert_eq!(motors.commanded[1], config.max_motor_speed);
    }

    #[test]
    fn test_first_order_lag() {
        let config = VehicleConfig::default();
        let mut motors = settled_motors(400.0, &config);
        let command = CommandVector::uniform(600.0);

        // One time constant covers 1 - 1/e of the step
        relax_motors(&mut motors, &command, &config, config.motor_time_constant);
        let expected = 600.0 - 200.0 * (-1.0f64).exp();
        assert_relative_eq!(motors.actual[0], expected, epsilon = 1e-9);

        for _ in 0..200 {
            relax_motors(&mut motors, &command, &config, 0.005);
        }
        assert_relative_eq!(motors.actual[3], 600.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reaction_torques_cancel_at_equal_speed() {
        let config = VehicleConfig::default();
        let motors = settled_motors(config.hover_motor_speed(), &config);
        assert_relative_eq!(motors.torque.sum(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(motors.thrust.sum(), config.weight(), epsilon = 1e-9);
    }
}
