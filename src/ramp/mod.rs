//! Color ramp construction from forecast samples.
//!
//! This module converts a discrete, 3-hourly forecast sequence into a
//! per-LED color frame. Two strategies exist: a windowed interpolating
//! builder that produces a smooth ramp, and a direct 1:1 mapper.

pub mod builder;
pub mod direct;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkystripError};

/// A single weather reading, reduced to what the color mapping needs.
///
/// `precipitation` is the rain volume in millimeters over the reporting
/// interval (3 hours for the OpenWeatherMap forecast feed). `None` means
/// the source reported no rain field at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSample {
    /// Cloudiness percentage, 0-100
    pub cloudiness: f64,
    /// Rain volume in mm over the reporting interval, if reported
    pub precipitation: Option<f64>,
}

/// An RGB color during interpolation.
///
/// Channels are semantically 0-255 but deliberately unclamped; they are
/// clamped by [`ColorStop::clamped`] just before reaching the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorStop {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl ColorStop {
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Clamp each channel to 0-255 for the render sink.
    pub fn clamped(&self) -> [u8; 3] {
        [
            self.r.clamp(0, 255) as u8,
            self.g.clamp(0, 255) as u8,
            self.b.clamp(0, 255) as u8,
        ]
    }
}

/// The two color axes and the rain-intensity saturation factor.
///
/// A sample commits entirely to one axis: sunny-to-cloudy when the source
/// reported no rain field, light-rain-to-heavy-rain otherwise. The axes
/// are never blended.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub sunny: ColorStop,
    pub cloudy: ColorStop,
    pub rain_light: ColorStop,
    pub rain_heavy: ColorStop,
    /// Multiplier converting mm of rain into an interpolation fraction,
    /// saturating at 1.0
    pub rain_saturation: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sunny: ColorStop::new(0xff, 0x00, 0x00),
            cloudy: ColorStop::new(0xa0, 0xa0, 0xa0),
            rain_light: ColorStop::new(0xa0, 0xa0, 0xa0),
            rain_heavy: ColorStop::new(0x00, 0x00, 0xff),
            rain_saturation: 0.3,
        }
    }
}

/// Linear interpolation of a single value.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a) * t + a
}

/// Per-channel linear interpolation between two colors.
///
/// Channels are truncated toward zero, not rounded. The truncation bias is
/// load-bearing: downstream output parity depends on it.
pub fn lerp_color(a: ColorStop, b: ColorStop, t: f64) -> ColorStop {
    ColorStop {
        r: lerp(a.r as f64, b.r as f64, t) as i32,
        g: lerp(a.g as f64, b.g as f64, t) as i32,
        b: lerp(a.b as f64, b.b as f64, t) as i32,
    }
}

/// Compute the base color for one forecast sample.
///
/// Any reported precipitation wins over cloudiness: rain is the more
/// actionable condition, so the cloudiness value is ignored entirely on
/// the rain axis. This is intentional, not a defect.
pub fn base_color(sample: &ForecastSample, palette: &Palette) -> ColorStop {
    match sample.precipitation {
        None => lerp_color(palette.sunny, palette.cloudy, sample.cloudiness / 100.0),
        Some(rain) => {
            let fraction = (rain * palette.rain_saturation).min(1.0);
            lerp_color(palette.rain_light, palette.rain_heavy, fraction)
        }
    }
}

/// Trait for frame-building strategies
pub trait FrameBuilder {
    /// Build one render frame from the forecast sequence
    fn build(&self, samples: &[ForecastSample], palette: &Palette) -> Result<Vec<ColorStop>>;

    /// Get the name of this strategy
    fn name(&self) -> &str;
}

/// Get a frame builder by mode name
pub fn get_builder(
    name: &str,
    ramp: builder::RampConfig,
    led_count: usize,
) -> Result<Box<dyn FrameBuilder>> {
    match name.to_lowercase().as_str() {
        "ramp" => Ok(Box::new(builder::RampBuilder::new(ramp)?)),
        "direct" => Ok(Box::new(direct::DirectMapper::new(led_count))),
        _ => Err(SkystripError::InvalidConfig {
            message: format!("Unknown render mode: {}", name),
        }),
    }
}
