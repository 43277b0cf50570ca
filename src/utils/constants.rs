pub const GRAVITY: f64 = 9.81; // m/s^2

pub const DEFAULT_TIME_STEP: f64 = 0.005; // s
pub const DEFAULT_DURATION: f64 = 16.0; // s

// Numerical guards
pub const MIN_TIME_CONSTANT: f64 = 1e-9; // s
pub const DIRECTION_EPSILON: f64 = 1e-9;
