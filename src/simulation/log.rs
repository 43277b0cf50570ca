use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::{CommandVector, DesiredState, EulerAngles, MotorState, VehicleState};
use crate::utils::SimError;

/// Everything observed at the end of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: usize,
    pub time: f64,
    pub state: VehicleState,
    pub euler: EulerAngles,
    pub motors: MotorState,
    /// Reference and command that drove the vehicle into `state`
    pub desired: DesiredState,
    pub command: CommandVector,
    pub wind: Vector3<f64>,
}

impl TickRecord {
    pub fn new(
        tick: usize,
        time: f64,
        state: &VehicleState,
        motors: &MotorState,
        desired: &DesiredState,
        command: &CommandVector,
        wind: &Vector3<f64>,
    ) -> Self {
        Self {
            tick,
            time,
            state: *state,
            euler: state.euler(),
            motors: *motors,
            desired: *desired,
            command: *command,
            wind: *wind,
        }
    }
}

/// Append-only time series of a run
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightLog {
    records: Vec<TickRecord>,
}

impl FlightLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: TickRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TickRecord> {
        self.records.last()
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_json_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let mut log = FlightLog::default();
        let state = VehicleState::at_position(Vector3::new(1.0, -2.0, 0.5));
        log.push(TickRecord::new(
            0,
            0.0,
            &state,
            &MotorState::default(),
            &DesiredState {
                yaw_rate: 0.11635528346628865,
                ..DesiredState::hold(Vector3::new(0.1, 0.2, 0.3), 0.3)
            },
            &CommandVector::uniform(400.0),
            &Vector3::new(0.0, 1.0, 0.0),
        ));

        let temp_file = NamedTempFile::new()?;
        log.save_json(temp_file.path())?;
        let loaded = FlightLog::load_json(temp_file.path())?;

        // Floats must come back bit for bit
        assert_eq!(loaded, log);
        assert_eq!(loaded.records()[0].desired.yaw_rate, 0.11635528346628865);
        Ok(())
    }
}
