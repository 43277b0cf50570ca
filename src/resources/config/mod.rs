pub mod controller;
pub mod simulation;
pub mod trajectory;
pub mod vehicle;
pub mod wind;

pub use controller::{ControlScheme, ControllerConfig, ControllerGains, ControllerLimits};
pub use simulation::{InitialConditions, SimulationConfig};
pub use trajectory::{
    BoundaryConditions, DerivativeOrder, PositionMode, SegmentTiming, TrajectoryConfig, Waypoint,
    YawMode,
};
pub use vehicle::{MotorPlacement, SpinDirection, VehicleConfig};
pub use wind::{GustConfig, WindConfig};
