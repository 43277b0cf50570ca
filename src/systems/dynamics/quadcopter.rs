use bevy::prelude::*;
use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use super::integrator::{rk4_step, BodyRates, BodyState};
use super::rotor::{relax_motors, settled_motors};
use crate::components::{CommandVector, MotorState, VehicleState};
use crate::resources::{VehicleConfig, WorldFrame};
use crate::utils::{quaternion_rate, ConfigurationError, DynamicsError};

/// Six degree-of-freedom rigid-body model of a quadrotor and its motors.
///
/// The vehicle and motor state are only ever changed by [`Quadcopter::step`].
#[derive(Component, Debug, Clone)]
pub struct Quadcopter {
    config: VehicleConfig,
    frame: WorldFrame,
    inertia_inv: Matrix3<f64>,
    /// Rotor positions relative to the centre of mass, body frame [m]
    arms: [Vector3<f64>; 4],
    state: VehicleState,
    motors: MotorState,
}

impl Quadcopter {
    /// Build the model with every rotor spinning at hover speed.
    pub fn new(
        config: VehicleConfig,
        frame: WorldFrame,
        initial: VehicleState,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if !initial.is_finite() {
            return Err(ConfigurationError::invalid(
                "initial",
                "initial vehicle state must be finite",
            ));
        }
        let inertia_inv = config
            .inertia
            .try_inverse()
            .ok_or_else(|| ConfigurationError::invalid("inertia", "matrix is singular"))?;
        let arms = config
            .motors
            .map(|m| frame.body_offset(m.forward, m.right));
        let motors = settled_motors(config.hover_motor_speed(), &config);

        Ok(Self {
            config,
            frame,
            inertia_inv,
            arms,
            state: initial,
            motors,
        })
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn motors(&self) -> &MotorState {
        &self.motors
    }

    /// Advance the vehicle by `dt` under the given rotor command and wind.
    ///
    /// Motor speeds are relaxed first and held through the integration. On
    /// error the stored state is left untouched.
    pub fn step(
        &mut self,
        time: f64,
        dt: f64,
        command: &CommandVector,
        wind: &Vector3<f64>,
    ) -> Result<VehicleState, DynamicsError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(DynamicsError::InvalidTimeStep { dt, time });
        }
        if !command.is_finite() {
            return Err(DynamicsError::NonFiniteInput {
                quantity: "motor command",
                time,
            });
        }
        if wind.iter().any(|v| !v.is_finite()) {
            return Err(DynamicsError::NonFiniteInput {
                quantity: "wind velocity",
                time,
            });
        }

        let mut motors = self.motors;
        relax_motors(&mut motors, command, &self.config, dt);

        let start = BodyState::from_vehicle(&self.state);
        let next = rk4_step(&start, dt, |s| self.derivatives(s, &motors, wind));
        if !next.is_finite() {
            return Err(DynamicsError::NonFiniteState {
                quantity: "rigid-body state",
                time,
            });
        }

        let attitude = next.rotation();
        if attitude.coords.iter().any(|v| !v.is_finite()) {
            return Err(DynamicsError::NonFiniteState {
                quantity: "attitude",
                time,
            });
        }

        self.state = VehicleState {
            position: next.position,
            velocity: next.velocity,
            attitude,
            angular_velocity: next.angular_velocity,
            acceleration: (next.velocity - start.velocity) / dt,
            angular_acceleration: (next.angular_velocity - start.angular_velocity) / dt,
        };
        self.motors = motors;

        Ok(self.state)
    }

    /// Net force in the world frame and net torque in the body frame.
    fn loads(
        &self,
        state: &BodyState,
        attitude: &UnitQuaternion<f64>,
        motors: &MotorState,
        wind: &Vector3<f64>,
    ) -> (Vector3<f64>, Vector3<f64>) {
        let up = self.frame.up();
        let config = &self.config;

        let thrust_body = up * motors.thrust.sum();
        let gravity = self.frame.gravity(config.gravity) * config.mass;
        let relative_air = wind - state.velocity;
        let drag = relative_air.component_mul(&relative_air.abs()) * config.drag_coefficient;
        let force = attitude * thrust_body + gravity + drag;

        let omega = state.angular_velocity;
        let mut torque = Vector3::zeros();
        for i in 0..4 {
            torque += self.arms[i].cross(&(up * motors.thrust[i]));
            torque += up * motors.torque[i];
        }
        torque -= omega * config.angular_damping;
        if config.use_precession {
            // Net rotor angular momentum along the up axis
            let spin: f64 = (0..4)
                .map(|i| -config.motors[i].spin.reaction_sign() * motors.actual[i])
                .sum();
            torque -= omega.cross(&(up * (config.rotor_inertia * spin)));
        }
        torque -= omega.cross(&(config.inertia * omega));

        (force, torque)
    }

    fn derivatives(&self, state: &BodyState, motors: &MotorState, wind: &Vector3<f64>) -> BodyRates {
        let attitude = state.rotation();
        let (force, torque) = self.loads(state, &attitude, motors, wind);

        BodyRates {
            velocity: state.velocity,
            acceleration: force / self.config.mass,
            attitude_rate: quaternion_rate(&state.attitude, &state.angular_velocity),
            angular_acceleration: self.inertia_inv * torque,
        }
    }
}
