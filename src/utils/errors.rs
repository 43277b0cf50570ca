use std::io;
use thiserror::Error;

/// Invalid or inconsistent setup. Always raised before the first tick runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{mode} requires at least {required} waypoint(s), got {found}")]
    NotEnoughWaypoints {
        mode: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Waypoint times must be strictly increasing (waypoint {index} at {time}s)")]
    NonIncreasingTimes { index: usize, time: f64 },

    #[error("Control allocation matrix is singular for the configured motor layout")]
    SingularAllocation,

    #[error("Trajectory constraint system is singular")]
    SingularTrajectory,
}

impl ConfigurationError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Failure while advancing the rigid-body state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynamicsError {
    #[error("Non-finite {quantity} supplied to dynamics at t={time:.4}s")]
    NonFiniteInput { quantity: &'static str, time: f64 },

    #[error("Integration produced a non-finite {quantity} at t={time:.4}s")]
    NonFiniteState { quantity: &'static str, time: f64 },

    #[error("Invalid time step {dt} at t={time:.4}s")]
    InvalidTimeStep { dt: f64, time: f64 },
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Simulation halted after tick {last_valid_tick} (t={last_valid_time:.4}s): {source}")]
    Halted {
        last_valid_tick: usize,
        last_valid_time: f64,
        #[source]
        source: DynamicsError,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    #[error("Log export error: {0}")]
    LogExport(#[from] serde_json::Error),
}
