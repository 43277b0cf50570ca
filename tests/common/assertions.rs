use approx::assert_relative_eq;
use nalgebra::Vector3;
use quadflyer::{components::VehicleState, simulation::FlightLog};

/// Assert that a vehicle state is finite with a unit attitude quaternion
#[track_caller]
pub fn assert_state_valid(state: &VehicleState) {
    assert!(
        state.position.iter().all(|x| x.is_finite()),
        "Position is not finite"
    );
    assert!(
        state.velocity.iter().all(|x| x.is_finite()),
        "Velocity is not finite"
    );
    assert!(
        state.angular_velocity.iter().all(|x| x.is_finite()),
        "Angular velocity is not finite"
    );
    assert_relative_eq!(state.attitude.coords.norm(), 1.0, epsilon = 1e-9);
}

/// Assert every record is valid and ticks are evenly spaced
#[track_caller]
pub fn assert_log_valid(log: &FlightLog, time_step: f64) {
    assert!(!log.is_empty(), "Flight log is empty");
    for (i, record) in log.records().iter().enumerate() {
        assert_eq!(record.tick, i);
        assert_relative_eq!(record.time, i as f64 * time_step, epsilon = 1e-9);
        assert_state_valid(&record.state);
    }
}

#[track_caller]
pub fn assert_position_near(actual: &Vector3<f64>, expected: &Vector3<f64>, tolerance: f64) {
    let error = (actual - expected).norm();
    assert!(
        error <= tolerance,
        "Position {:?} is {:.4} m from {:?} (tolerance {})",
        actual.as_slice(),
        error,
        expected.as_slice(),
        tolerance
    );
}
