use nalgebra::{Vector2, Vector3};

use crate::components::{DesiredState, VehicleState};
use crate::resources::{ControlScheme, ControllerGains, ControllerLimits, VehicleConfig, WorldFrame};

/// Velocity setpoint from the position error on the axes the scheme closes.
pub fn velocity_setpoint(
    scheme: ControlScheme,
    gains: &ControllerGains,
    limits: &ControllerLimits,
    state: &VehicleState,
    desired: &DesiredState,
) -> Vector3<f64> {
    let mut setpoint = desired.velocity;
    for (axis, active) in scheme.position_axes().iter().enumerate() {
        if *active {
            setpoint[axis] += gains.position_p[axis] * (desired.position[axis] - state.position[axis]);
        }
    }
    saturate_velocity(setpoint, limits)
}

fn saturate_velocity(mut setpoint: Vector3<f64>, limits: &ControllerLimits) -> Vector3<f64> {
    if limits.saturate_per_axis {
        for axis in 0..3 {
            let bound = limits.max_velocity[axis];
            setpoint[axis] = setpoint[axis].clamp(-bound, bound);
        }
    } else {
        let horizontal = Vector2::new(setpoint.x, setpoint.y);
        let speed = horizontal.norm();
        if speed > limits.max_horizontal_speed {
            let scaled = horizontal * (limits.max_horizontal_speed / speed);
            setpoint.x = scaled.x;
            setpoint.y = scaled.y;
        }
        let bound = limits.max_velocity.z;
        setpoint.z = setpoint.z.clamp(-bound, bound);
    }
    setpoint
}

/// PID on the velocity error producing the world-frame thrust vector the
/// rotors must deliver.
#[derive(Debug, Clone, Default)]
pub struct VelocityLoop {
    integral: Vector3<f64>,
}

impl VelocityLoop {
    pub fn integral(&self) -> &Vector3<f64> {
        &self.integral
    }

    #[allow(clippy::too_many_arguments)]
    pub fn thrust_setpoint(
        &mut self,
        gains: &ControllerGains,
        limits: &ControllerLimits,
        vehicle: &VehicleConfig,
        frame: WorldFrame,
        use_integral: bool,
        state: &VehicleState,
        desired: &DesiredState,
        velocity_setpoint: &Vector3<f64>,
        dt: f64,
    ) -> Vector3<f64> {
        let error = velocity_setpoint - state.velocity;
        let feed_forward = (desired.acceleration - frame.gravity(vehicle.gravity)) * vehicle.mass;
        let raw = gains.velocity_p.component_mul(&error)
            - gains.velocity_d.component_mul(&state.acceleration)
            + feed_forward
            + self.integral;

        let max_thrust = vehicle.max_thrust();
        let (lower, upper) = frame.vertical_thrust_bounds(vehicle.min_thrust(), max_thrust);
        let thrust_z = raw.z.clamp(lower, upper);

        // Conditional integration: freeze while pushing further into saturation
        let winding_up = (raw.z >= upper && error.z >= 0.0) || (raw.z <= lower && error.z <= 0.0);
        if use_integral && !winding_up {
            let bound = max_thrust;
            self.integral.z = (self.integral.z + gains.velocity_i.z * error.z * dt).clamp(-bound, bound);
        }

        let raw_xy = Vector2::new(raw.x, raw.y);
        let tilt_limit = thrust_z.abs() * limits.max_tilt.tan();
        let excess_limit = (max_thrust * max_thrust - thrust_z * thrust_z).max(0.0).sqrt();
        let xy_limit = tilt_limit.min(excess_limit);
        let thrust_xy = if raw_xy.norm() > xy_limit {
            raw_xy * (xy_limit / raw_xy.norm())
        } else {
            raw_xy
        };

        // Tracking anti-windup on the horizontal integrator, bounded like the
        // vertical one for axes without a proportional term
        if use_integral {
            for axis in 0..2 {
                let kp = gains.velocity_p[axis];
                let tracking = if kp > 0.0 { 2.0 / kp } else { 0.0 };
                let limited_error = error[axis] - (raw_xy[axis] - thrust_xy[axis]) * tracking;
                self.integral[axis] = (self.integral[axis]
                    + gains.velocity_i[axis] * limited_error * dt)
                    .clamp(-max_thrust, max_thrust);
            }
        }

        Vector3::new(thrust_xy.x, thrust_xy.y, thrust_z)
    }
}
