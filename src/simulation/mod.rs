pub mod log;
pub mod sweep;

use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{CommandVector, DesiredState, VehicleState};
use crate::resources::SimulationConfig;
use crate::systems::{FlightController, Quadcopter, TrajectoryGenerator, WindField};
use crate::utils::{ConfigurationError, SimError};

pub use log::{FlightLog, TickRecord};
pub use sweep::run_sweep;

/// The four collaborators of a run, built and validated together.
#[derive(Debug, Clone)]
pub struct VehicleAssembly {
    pub quadcopter: Quadcopter,
    pub controller: FlightController,
    pub trajectory: TrajectoryGenerator,
    pub wind: WindField,
}

impl VehicleAssembly {
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let trajectory = TrajectoryGenerator::new(&config.trajectory)?;
        let controller = FlightController::new(
            &config.controller,
            &config.vehicle,
            config.frame,
            trajectory.yaw_mode(),
        )?;
        let initial = VehicleState::new(
            config.initial_position(),
            config.initial.velocity,
            config.initial_attitude(),
            config.initial.angular_velocity,
        );
        let quadcopter = Quadcopter::new(config.vehicle.clone(), config.frame, initial)?;
        let wind = WindField::new(&config.wind, config.frame)?;

        Ok(Self {
            quadcopter,
            controller,
            trajectory,
            wind,
        })
    }

    /// Record of the state before any tick has run.
    pub fn initial_record(&self) -> TickRecord {
        let state = self.quadcopter.state();
        let motors = self.quadcopter.motors();
        TickRecord::new(
            0,
            0.0,
            state,
            motors,
            &self.trajectory.desired_state(0.0, Some(state)),
            &CommandVector::new(motors.commanded),
            &self.wind.velocity(0.0, &state.position),
        )
    }
}

/// Fixed-step coordinator: trajectory, then controller, then dynamics.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    assembly: VehicleAssembly,
    tick: usize,
    end_tick: usize,
    log: FlightLog,
}

impl Simulation {
    /// Validate the configuration and build every component. Nothing is
    /// stepped here, so a bad setup never produces a partial log.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        let assembly = VehicleAssembly::new(&config)?;
        let end_tick = config.tick_count();
        let mut log = FlightLog::with_capacity(end_tick + 1);
        log.push(assembly.initial_record());

        Ok(Self {
            config,
            assembly,
            tick: 0,
            end_tick,
            log,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * self.config.time_step
    }

    pub fn state(&self) -> &VehicleState {
        self.assembly.quadcopter.state()
    }

    pub fn controller(&self) -> &FlightController {
        &self.assembly.controller
    }

    pub fn trajectory(&self) -> &TrajectoryGenerator {
        &self.assembly.trajectory
    }

    pub fn log(&self) -> &FlightLog {
        &self.log
    }

    pub fn into_log(self) -> FlightLog {
        self.log
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.end_tick
    }

    /// Advance one tick and append its record.
    pub fn step(&mut self) -> Result<&TickRecord, SimError> {
        let dt = self.config.time_step;
        let time = self.time();
        let assembly = &mut self.assembly;

        let state = *assembly.quadcopter.state();
        let desired: DesiredState = assembly.trajectory.desired_state(time, Some(&state));
        let command = assembly.controller.compute_command(&state, &desired, dt);
        let wind: Vector3<f64> = assembly.wind.velocity(time, &state.position);

        let next = assembly
            .quadcopter
            .step(time, dt, &command, &wind)
            .map_err(|source| {
                error!("Simulation halted at t={:.4}s: {}", time, source);
                SimError::Halted {
                    last_valid_tick: self.tick,
                    last_valid_time: time,
                    source,
                }
            })?;

        self.tick += 1;
        let record = TickRecord::new(
            self.tick,
            self.tick as f64 * dt,
            &next,
            assembly.quadcopter.motors(),
            &desired,
            &command,
            &wind,
        );
        self.log.push(record);
        Ok(&self.log.records()[self.log.len() - 1])
    }

    /// Run every remaining tick.
    pub fn run(&mut self) -> Result<&FlightLog, SimError> {
        info!(
            "Running {} ticks of {:.4}s in {:?} frame",
            self.end_tick - self.tick.min(self.end_tick),
            self.config.time_step,
            self.config.frame
        );
        while !self.is_finished() {
            self.step()?;
        }
        if let Some(last) = self.log.last() {
            info!(
                "Finished at t={:.3}s, position {:?}",
                last.time,
                last.state.position.as_slice()
            );
        }
        Ok(&self.log)
    }
}
