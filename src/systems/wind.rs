use bevy::prelude::*;
use nalgebra::Vector3;
use rand::Rng;
use std::f64::consts::PI;
use std::sync::Arc;

use crate::resources::{GustConfig, WindConfig, WorldFrame};
use crate::utils::{deg_to_rad, ConfigurationError, RngManager, WindStream};

/// Ambient air velocity as a pure function of time and position.
pub trait WindModel {
    /// Wind velocity in the world frame [m/s]
    fn velocity(&self, time: f64, position: &Vector3<f64>) -> Vector3<f64>;
}

/// Wind vector for a speed blowing towards `heading`, tilted `elevation`
/// above the horizontal plane.
fn wind_vector(frame: WorldFrame, speed: f64, heading: f64, elevation: f64) -> Vector3<f64> {
    let horizontal = Vector3::new(heading.cos(), heading.sin(), 0.0) * (speed * elevation.cos());
    horizontal + frame.up() * (speed * elevation.sin())
}

pub struct CalmWind;

impl WindModel for CalmWind {
    fn velocity(&self, _time: f64, _position: &Vector3<f64>) -> Vector3<f64> {
        Vector3::zeros()
    }
}

pub struct ConstantWind {
    velocity: Vector3<f64>,
}

impl ConstantWind {
    pub fn new(velocity: Vector3<f64>) -> Self {
        Self { velocity }
    }
}

impl WindModel for ConstantWind {
    fn velocity(&self, _time: f64, _position: &Vector3<f64>) -> Vector3<f64> {
        self.velocity
    }
}

#[derive(Debug, Clone, Copy)]
struct Sinusoid {
    amplitude: f64,
    frequency: f64,
    phase: f64,
}

/// Sum of sinusoids whose amplitudes add up to at most `amplitude`.
#[derive(Debug, Clone)]
struct GustChannel {
    components: Vec<Sinusoid>,
}

impl GustChannel {
    fn draw<R: Rng>(rng: &mut R, amplitude: f64, config: &GustConfig) -> Self {
        let weights: Vec<f64> = (0..config.components)
            .map(|_| rng.gen_range(0.1..=1.0))
            .collect();
        let total: f64 = weights.iter().sum();

        let components = weights
            .iter()
            .map(|w| {
                let frequency = if config.max_frequency > config.min_frequency {
                    rng.gen_range(config.min_frequency..config.max_frequency)
                } else {
                    config.min_frequency
                };
                Sinusoid {
                    amplitude: amplitude * w / total,
                    frequency,
                    phase: rng.gen_range(0.0..2.0 * PI),
                }
            })
            .collect();

        Self { components }
    }

    fn value(&self, time: f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.amplitude * (c.frequency * time + c.phase).sin())
            .sum()
    }
}

/// Mean wind with time-correlated perturbations of speed, heading and
/// elevation, drawn once from the configured seed.
pub struct GustWind {
    frame: WorldFrame,
    mean_speed: f64,
    heading: f64,
    elevation: f64,
    speed: GustChannel,
    heading_gust: GustChannel,
    elevation_gust: GustChannel,
}

impl GustWind {
    pub fn new(config: &GustConfig, frame: WorldFrame) -> Self {
        let seeds = RngManager::new(config.seed);
        let channel = |stream: WindStream, amplitude: f64| {
            GustChannel::draw(&mut seeds.stream(stream), amplitude, config)
        };
        let speed = channel(WindStream::GustSpeed, config.speed_amplitude);
        let heading_gust = channel(
            WindStream::GustHeading,
            deg_to_rad(config.heading_amplitude_deg),
        );
        let elevation_gust = channel(
            WindStream::GustElevation,
            deg_to_rad(config.elevation_amplitude_deg),
        );

        Self {
            frame,
            mean_speed: config.mean_speed,
            heading: deg_to_rad(config.heading_deg),
            elevation: deg_to_rad(config.elevation_deg),
            speed,
            heading_gust,
            elevation_gust,
        }
    }
}

impl WindModel for GustWind {
    fn velocity(&self, time: f64, _position: &Vector3<f64>) -> Vector3<f64> {
        let speed = (self.mean_speed + self.speed.value(time)).max(0.0);
        let heading = self.heading + self.heading_gust.value(time);
        let elevation = self.elevation + self.elevation_gust.value(time);
        wind_vector(self.frame, speed, heading, elevation)
    }
}

/// Horizontal shear layer, `u_r (h / z_r)^alpha` above the ground plane.
pub struct PowerLawWind {
    frame: WorldFrame,
    reference_speed: f64,
    reference_height: f64,
    heading: f64,
    alpha: f64,
}

impl WindModel for PowerLawWind {
    fn velocity(&self, _time: f64, position: &Vector3<f64>) -> Vector3<f64> {
        let height = self.frame.altitude(position);
        if height <= 0.0 {
            return Vector3::zeros();
        }
        let speed = self.reference_speed * (height / self.reference_height).powf(self.alpha);
        wind_vector(self.frame, speed, self.heading, 0.0)
    }
}

/// Wind source sampled once per tick.
#[derive(Component, Clone)]
pub struct WindField {
    model: Arc<dyn WindModel + Send + Sync>,
}

impl WindField {
    pub fn new(config: &WindConfig, frame: WorldFrame) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let model = match config {
            WindConfig::None => return Ok(Self::calm()),
            WindConfig::Constant {
                speed,
                heading_deg,
                elevation_deg,
            } => Arc::new(ConstantWind::new(wind_vector(
                frame,
                *speed,
                deg_to_rad(*heading_deg),
                deg_to_rad(*elevation_deg),
            ))) as Arc<dyn WindModel + Send + Sync>,
            WindConfig::Gust(gust) => {
                Arc::new(GustWind::new(gust, frame)) as Arc<dyn WindModel + Send + Sync>
            }
            WindConfig::PowerLaw {
                reference_speed,
                reference_height,
                heading_deg,
                alpha,
            } => Arc::new(PowerLawWind {
                frame,
                reference_speed: *reference_speed,
                reference_height: *reference_height,
                heading: deg_to_rad(*heading_deg),
                alpha: *alpha,
            }) as Arc<dyn WindModel + Send + Sync>,
        };

        Ok(Self { model })
    }

    pub fn calm() -> Self {
        Self {
            model: Arc::new(CalmWind),
        }
    }

    pub fn velocity(&self, time: f64, position: &Vector3<f64>) -> Vector3<f64> {
        self.model.velocity(time, position)
    }
}

impl std::fmt::Debug for WindField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindField").finish_non_exhaustive()
    }
}
