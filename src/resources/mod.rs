pub mod config;
mod frame;

pub use config::{
    controller::{ControlScheme, ControllerConfig, ControllerGains, ControllerLimits},
    simulation::{InitialConditions, SimulationConfig},
    trajectory::{
        BoundaryConditions, DerivativeOrder, PositionMode, SegmentTiming, TrajectoryConfig,
        Waypoint, YawMode,
    },
    vehicle::{MotorPlacement, SpinDirection, VehicleConfig},
    wind::{GustConfig, WindConfig},
};
pub use frame::WorldFrame;
