use bevy::prelude::*;
use rayon::prelude::*;

use super::{FlightLog, Simulation};
use crate::resources::SimulationConfig;
use crate::utils::SimError;

/// Run independent simulations in parallel, one per configuration.
///
/// Results come back in the order of `configs`. Every run owns its own
/// components, so the outcome matches running them one after another.
pub fn run_sweep(configs: Vec<SimulationConfig>) -> Vec<Result<FlightLog, SimError>> {
    info!("Starting sweep over {} configurations", configs.len());
    configs
        .into_par_iter()
        .map(|config| -> Result<FlightLog, SimError> {
            let mut simulation = Simulation::new(config)?;
            simulation.run()?;
            Ok(simulation.into_log())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{TrajectoryConfig, WindConfig};
    use nalgebra::Vector3;

    fn short_config(target: Vector3<f64>) -> SimulationConfig {
        SimulationConfig {
            duration: 0.5,
            trajectory: TrajectoryConfig::hover_at(target, 0.0),
            wind: WindConfig::None,
            ..Default::default()
        }
    }

    #[test]
    fn test_sweep_preserves_order_and_reports_errors() {
        let mut broken = short_config(Vector3::zeros());
        broken.time_step = -1.0;

        let results = run_sweep(vec![
            short_config(Vector3::new(1.0, 0.0, 0.0)),
            broken,
            short_config(Vector3::new(0.0, 1.0, 0.0)),
        ]);

        assert_eq!(results.len(), 3);
        assert!(matches!(results[1], Err(SimError::Configuration(_))));
        let first = results[0].as_ref().unwrap();
        let third = results[2].as_ref().unwrap();
        assert_eq!(first.len(), 101);
        assert_eq!(first.records()[0].desired.position, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(third.records()[0].desired.position, Vector3::new(0.0, 1.0, 0.0));
    }
}
