mod assertions;
mod helpers;
mod test_app;

// Re-export
pub use assertions::{assert_log_valid, assert_position_near};

pub use helpers::*;

pub use test_app::TestApp;
