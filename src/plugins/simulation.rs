use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{CommandVector, DesiredState};
use crate::resources::{SimulationConfig, WorldFrame};
use crate::simulation::{FlightLog, TickRecord, VehicleAssembly};
use crate::systems::{FlightController, Quadcopter, TrajectoryGenerator, WindField};
use crate::utils::ConfigurationError;

/// Stages of one simulation tick
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum FlightSet {
    Trajectory,
    Control,
    Wind,
    Dynamics,
    Logging,
}

/// Tick counter of the fixed-step loop
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    pub tick: usize,
    pub time_step: f64,
    pub end_tick: usize,
}

impl SimClock {
    pub fn time(&self) -> f64 {
        self.tick as f64 * self.time_step
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub enum SimulationStatus {
    #[default]
    Running,
    Finished,
    Halted {
        last_valid_tick: usize,
        last_valid_time: f64,
        reason: String,
    },
}

/// Wind sampled for the current tick
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AmbientWind(pub Vector3<f64>);

/// Runs the trajectory, controller, wind and dynamics of one vehicle as
/// chained `FixedUpdate` systems.
pub struct QuadSimPlugin {
    config: SimulationConfig,
    assembly: VehicleAssembly,
}

impl QuadSimPlugin {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        let assembly = VehicleAssembly::new(&config)?;
        Ok(Self { config, assembly })
    }
}

impl Plugin for QuadSimPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;
        let initial = self.assembly.initial_record();
        let mut log = FlightLog::with_capacity(config.tick_count() + 1);
        log.push(initial.clone());

        app.insert_resource(Time::<Fixed>::from_seconds(config.time_step))
            .insert_resource(config.frame)
            .insert_resource(config.clone())
            .insert_resource(SimClock {
                tick: 0,
                time_step: config.time_step,
                end_tick: config.tick_count(),
            })
            .insert_resource(if config.tick_count() == 0 {
                SimulationStatus::Finished
            } else {
                SimulationStatus::Running
            })
            .insert_resource(log);

        app.world_mut().spawn((
            self.assembly.quadcopter.clone(),
            self.assembly.controller.clone(),
            self.assembly.trajectory.clone(),
            self.assembly.wind.clone(),
            initial.desired,
            initial.command,
            AmbientWind(initial.wind),
        ));

        app.configure_sets(
            FixedUpdate,
            (
                FlightSet::Trajectory,
                FlightSet::Control,
                FlightSet::Wind,
                FlightSet::Dynamics,
                FlightSet::Logging,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                trajectory_system.in_set(FlightSet::Trajectory),
                controller_system.in_set(FlightSet::Control),
                wind_system.in_set(FlightSet::Wind),
                dynamics_system.in_set(FlightSet::Dynamics),
                logging_system.in_set(FlightSet::Logging),
            )
                .distributive_run_if(simulation_running),
        );

        info!(
            "Quadrotor simulation ready: {} ticks of {:.4}s ({:?})",
            config.tick_count(),
            config.time_step,
            app.world().resource::<WorldFrame>()
        );
    }
}

pub fn simulation_running(status: Res<SimulationStatus>) -> bool {
    *status == SimulationStatus::Running
}

fn trajectory_system(
    clock: Res<SimClock>,
    mut query: Query<(&TrajectoryGenerator, &Quadcopter, &mut DesiredState)>,
) {
    let time = clock.time();
    for (trajectory, quad, mut desired) in &mut query {
        *desired = trajectory.desired_state(time, Some(quad.state()));
    }
}

fn controller_system(
    clock: Res<SimClock>,
    mut query: Query<(&mut FlightController, &Quadcopter, &DesiredState, &mut CommandVector)>,
) {
    for (mut controller, quad, desired, mut command) in &mut query {
        *command = controller.compute_command(quad.state(), desired, clock.time_step);
    }
}

fn wind_system(clock: Res<SimClock>, mut query: Query<(&WindField, &Quadcopter, &mut AmbientWind)>) {
    let time = clock.time();
    for (wind, quad, mut ambient) in &mut query {
        ambient.0 = wind.velocity(time, &quad.state().position);
    }
}

fn dynamics_system(
    clock: Res<SimClock>,
    mut status: ResMut<SimulationStatus>,
    mut query: Query<(&mut Quadcopter, &CommandVector, &AmbientWind)>,
) {
    let time = clock.time();
    for (mut quad, command, ambient) in &mut query {
        if let Err(err) = quad.step(time, clock.time_step, command, &ambient.0) {
            error!("Simulation halted at t={:.4}s: {}", time, err);
            *status = SimulationStatus::Halted {
                last_valid_tick: clock.tick,
                last_valid_time: time,
                reason: err.to_string(),
            };
        }
    }
}

fn logging_system(
    mut clock: ResMut<SimClock>,
    mut status: ResMut<SimulationStatus>,
    mut log: ResMut<FlightLog>,
    query: Query<(&Quadcopter, &DesiredState, &CommandVector, &AmbientWind)>,
) {
    clock.tick += 1;
    let time = clock.time();
    for (quad, desired, command, ambient) in &query {
        log.push(TickRecord::new(
            clock.tick,
            time,
            quad.state(),
            quad.motors(),
            desired,
            command,
            &ambient.0,
        ));
    }

    if clock.tick >= clock.end_tick {
        info!("Simulation finished at t={:.3}s", time);
        *status = SimulationStatus::Finished;
    }
}
