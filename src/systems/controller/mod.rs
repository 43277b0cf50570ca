pub mod attitude;
pub mod position;
pub mod rate;

use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::components::{CommandVector, DesiredState, VehicleState};
use crate::resources::{ControllerConfig, VehicleConfig, WorldFrame, YawMode};
use crate::systems::dynamics::ControlAllocation;
use crate::utils::ConfigurationError;

use attitude::{attitude_from_thrust, blended_attitude, rate_setpoint};
use position::{velocity_setpoint, VelocityLoop};
use rate::rate_torque;

/// Intermediate setpoints of the last computed command, kept for logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSetpoints {
    pub velocity: Vector3<f64>,
    /// Thrust vector in the world frame [N]
    pub thrust: Vector3<f64>,
    pub attitude: UnitQuaternion<f64>,
    pub rate: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl Default for ControlSetpoints {
    fn default() -> Self {
        Self {
            velocity: Vector3::zeros(),
            thrust: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            rate: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }
}

/// Cascaded position, velocity, attitude and rate controller.
///
/// The velocity integrator is the only state carried between ticks.
#[derive(Component, Debug, Clone)]
pub struct FlightController {
    config: ControllerConfig,
    vehicle: VehicleConfig,
    frame: WorldFrame,
    allocation: ControlAllocation,
    /// Share of the heading correction applied by the attitude stage
    yaw_weight: f64,
    attitude_gains: Vector3<f64>,
    velocity_loop: VelocityLoop,
    setpoints: ControlSetpoints,
}

impl FlightController {
    pub fn new(
        config: &ControllerConfig,
        vehicle: &VehicleConfig,
        frame: WorldFrame,
        yaw_mode: YawMode,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        vehicle.validate()?;
        let allocation = ControlAllocation::new(vehicle, frame)?;

        let roll_pitch = config.gains.attitude_p.x;
        let yaw_gain = match yaw_mode {
            YawMode::None => 0.0,
            _ => config.gains.attitude_p.z,
        };
        let yaw_weight = (yaw_gain / roll_pitch).clamp(0.0, 1.0);
        // Heading error is scaled by the yaw weight, so the z axis uses the tilt gain
        let attitude_gains = Vector3::new(roll_pitch, config.gains.attitude_p.y, roll_pitch);

        Ok(Self {
            config: config.clone(),
            vehicle: vehicle.clone(),
            frame,
            allocation,
            yaw_weight,
            attitude_gains,
            velocity_loop: VelocityLoop::default(),
            setpoints: ControlSetpoints::default(),
        })
    }

    pub fn setpoints(&self) -> &ControlSetpoints {
        &self.setpoints
    }

    pub fn yaw_weight(&self) -> f64 {
        self.yaw_weight
    }

    pub fn integral(&self) -> &Vector3<f64> {
        self.velocity_loop.integral()
    }

    pub fn allocation(&self) -> &ControlAllocation {
        &self.allocation
    }

    /// Motor speed command for the observed state and reference.
    pub fn compute_command(
        &mut self,
        state: &VehicleState,
        desired: &DesiredState,
        dt: f64,
    ) -> CommandVector {
        let gains = &self.config.gains;
        let limits = &self.config.limits;

        let velocity = velocity_setpoint(self.config.scheme, gains, limits, state, desired);
        let thrust = self.velocity_loop.thrust_setpoint(
            gains,
            limits,
            &self.vehicle,
            self.frame,
            self.config.use_integral,
            state,
            desired,
            &velocity,
            dt,
        );

        let full = attitude_from_thrust(self.frame, &thrust, desired.yaw);
        let attitude = blended_attitude(&state.attitude, &full, self.yaw_weight);
        let rate = rate_setpoint(
            &state.attitude,
            &attitude,
            &self.attitude_gains,
            desired.yaw_rate,
            &limits.max_rate,
        );
        let torque = rate_torque(&gains.rate_p, &gains.rate_d, &rate, state);

        self.setpoints = ControlSetpoints {
            velocity,
            thrust,
            attitude,
            rate,
            torque,
        };

        CommandVector::new(self.allocation.speeds(thrust.norm(), &torque))
    }
}
