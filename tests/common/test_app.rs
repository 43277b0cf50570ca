use bevy::prelude::*;
use quadflyer::{
    plugins::{QuadSimPlugin, SimClock, SimulationStatus},
    resources::SimulationConfig,
    simulation::FlightLog,
    systems::Quadcopter,
};

/// Headless application running one vehicle through the simulation plugin.
///
/// Ticks are driven by running the `FixedUpdate` schedule directly, so no
/// wall-clock time is involved.
pub struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn new(config: SimulationConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(QuadSimPlugin::new(config).expect("valid test configuration"));
        app.finish();
        app.cleanup();
        Self { app }
    }

    pub fn run_ticks(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn run_to_completion(&mut self) {
        while *self.status() == SimulationStatus::Running {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn status(&self) -> &SimulationStatus {
        self.app.world().resource::<SimulationStatus>()
    }

    pub fn clock(&self) -> &SimClock {
        self.app.world().resource::<SimClock>()
    }

    pub fn log(&self) -> &FlightLog {
        self.app.world().resource::<FlightLog>()
    }

    pub fn quadcopter(&mut self) -> Option<&Quadcopter> {
        let world = self.app.world_mut();
        let mut query = world.query::<&Quadcopter>();
        query.get_single(world).ok()
    }
}
