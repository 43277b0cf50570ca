pub mod desired;
pub mod motor;
pub mod state;

pub use desired::DesiredState;
pub use motor::{CommandVector, MotorState};
pub use state::{EulerAngles, VehicleState};
