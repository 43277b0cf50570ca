mod simulation;

pub use simulation::{
    simulation_running, AmbientWind, FlightSet, QuadSimPlugin, SimClock, SimulationStatus,
};
