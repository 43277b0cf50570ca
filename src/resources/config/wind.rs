use serde::{Deserialize, Serialize};

use crate::utils::ConfigurationError;

/// Base wind plus a bounded sum of sinusoids on speed, heading and elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GustConfig {
    pub seed: u64,
    /// Mean wind speed [m/s]
    pub mean_speed: f64,
    /// Direction the wind blows towards, measured from the world x axis [deg]
    pub heading_deg: f64,
    /// Angle above the horizontal plane, positive upward [deg]
    pub elevation_deg: f64,
    /// Peak deviation of each channel
    pub speed_amplitude: f64,
    pub heading_amplitude_deg: f64,
    pub elevation_amplitude_deg: f64,
    /// Frequency bounds of the sinusoidal components [rad/s]
    pub min_frequency: f64,
    pub max_frequency: f64,
    /// Sinusoids per channel
    pub components: usize,
}

impl Default for GustConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mean_speed: 2.0,
            heading_deg: 90.0,
            elevation_deg: -15.0,
            speed_amplitude: 1.0,
            heading_amplitude_deg: 15.0,
            elevation_amplitude_deg: 5.0,
            min_frequency: 0.2,
            max_frequency: 2.0,
            components: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum WindConfig {
    #[default]
    None,
    Constant {
        speed: f64,
        heading_deg: f64,
        #[serde(default)]
        elevation_deg: f64,
    },
    Gust(GustConfig),
    /// Shear profile `u_r (h / z_r)^alpha` along a fixed heading
    PowerLaw {
        reference_speed: f64,
        reference_height: f64,
        heading_deg: f64,
        alpha: f64,
    },
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::invalid(name, "must be finite"))
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::invalid(
            name,
            format!("must be non-negative and finite, got {}", value),
        ))
    }
}

impl WindConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            WindConfig::None => Ok(()),
            WindConfig::Constant {
                speed,
                heading_deg,
                elevation_deg,
            } => {
                check_non_negative("speed", *speed)?;
                check_finite("heading_deg", *heading_deg)?;
                check_finite("elevation_deg", *elevation_deg)
            }
            WindConfig::Gust(gust) => {
                check_non_negative("mean_speed", gust.mean_speed)?;
                check_finite("heading_deg", gust.heading_deg)?;
                check_finite("elevation_deg", gust.elevation_deg)?;
                check_non_negative("speed_amplitude", gust.speed_amplitude)?;
                check_non_negative("heading_amplitude_deg", gust.heading_amplitude_deg)?;
                check_non_negative("elevation_amplitude_deg", gust.elevation_amplitude_deg)?;
                check_non_negative("min_frequency", gust.min_frequency)?;
                check_non_negative("max_frequency", gust.max_frequency)?;
                if gust.min_frequency > gust.max_frequency {
                    return Err(ConfigurationError::invalid(
                        "min_frequency",
                        "must not exceed max_frequency",
                    ));
                }
                Ok(())
            }
            WindConfig::PowerLaw {
                reference_speed,
                reference_height,
                heading_deg,
                alpha,
            } => {
                check_non_negative("reference_speed", *reference_speed)?;
                check_finite("heading_deg", *heading_deg)?;
                check_non_negative("alpha", *alpha)?;
                if !(reference_height.is_finite() && *reference_height > 0.0) {
                    return Err(ConfigurationError::invalid(
                        "reference_height",
                        "must be positive and finite",
                    ));
                }
                Ok(())
            }
        }
    }
}
