pub mod controller;
pub mod dynamics;
pub mod trajectory;
pub mod wind;

pub use controller::{ControlSetpoints, FlightController};
pub use dynamics::{ControlAllocation, Quadcopter};
pub use trajectory::{TrajectoryGenerator, TrajectorySegment};
pub use wind::{WindField, WindModel};
