pub mod integrator;
pub mod mixer;
pub mod quadcopter;
pub mod rotor;

pub use mixer::ControlAllocation;
pub use quadcopter::Quadcopter;
