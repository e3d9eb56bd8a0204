//! Windowed interpolating ramp builder.
//!
//! Takes a window of consecutive forecast samples and expands it into a
//! smooth color ramp by inserting interpolated colors between each pair of
//! adjacent samples.

use super::{base_color, lerp_color, ColorStop, ForecastSample, FrameBuilder, Palette};
use crate::error::{Result, SkystripError};

/// Window and resolution settings for [`RampBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampConfig {
    /// Index of the first forecast sample to use. The 3-hourly feed starts
    /// at the next reporting boundary, so skipping one sample aligns the
    /// window to a fixed local start-of-day hour.
    pub window_start: usize,
    /// Number of consecutive samples used as interpolation anchors
    pub window_length: usize,
    /// Output colors per sample interval; sub-step colors are interpolated
    pub steps_per_interval: usize,
}

impl Default for RampConfig {
    fn default() -> Self {
        // 7 samples covering 06:00-24:00 local, one LED per hour boundary
        Self {
            window_start: 1,
            window_length: 7,
            steps_per_interval: 3,
        }
    }
}

impl RampConfig {
    /// Number of colors the builder produces: one per sample boundary plus
    /// the interpolated in-betweens.
    pub fn output_len(&self) -> usize {
        self.window_length * self.steps_per_interval - (self.steps_per_interval - 1)
    }

    /// Minimum number of forecast samples the caller must supply
    pub fn required_samples(&self) -> usize {
        self.window_start + self.window_length
    }

    fn validate(&self) -> Result<()> {
        if self.window_length < 1 {
            return Err(SkystripError::InvalidConfig {
                message: "window_length must be at least 1".to_string(),
            });
        }
        if self.steps_per_interval < 1 {
            return Err(SkystripError::InvalidConfig {
                message: "steps_per_interval must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Interpolating frame builder
pub struct RampBuilder {
    config: RampConfig,
}

impl RampBuilder {
    pub fn new(config: RampConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Color for one output index within the window.
    ///
    /// Index `i` maps to sample `i / steps` and sub-step `i % steps`.
    /// Sub-step 0 is a sample boundary and takes that sample's base color
    /// verbatim; other sub-steps interpolate toward the next sample.
    fn color_at(&self, window: &[ForecastSample], palette: &Palette, i: usize) -> ColorStop {
        let steps = self.config.steps_per_interval;
        let sample = i / steps;
        let sub = i % steps;

        if sub == 0 {
            return base_color(&window[sample], palette);
        }

        let a = base_color(&window[sample], palette);
        let b = base_color(&window[sample + 1], palette);
        lerp_color(a, b, sub as f64 / steps as f64)
    }
}

impl FrameBuilder for RampBuilder {
    fn build(&self, samples: &[ForecastSample], palette: &Palette) -> Result<Vec<ColorStop>> {
        let needed = self.config.required_samples();
        if samples.len() < needed {
            return Err(SkystripError::InsufficientData {
                needed,
                got: samples.len(),
            });
        }

        let window =
            &samples[self.config.window_start..self.config.window_start + self.config.window_length];

        // The output length guarantees the last index lands on the final
        // sample boundary, so `sample + 1` never leaves the window.
        Ok((0..self.config.output_len())
            .map(|i| self.color_at(window, palette, i))
            .collect())
    }

    fn name(&self) -> &str {
        "ramp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry(cloudiness: f64) -> ForecastSample {
        ForecastSample {
            cloudiness,
            precipitation: None,
        }
    }

    fn rainy(mm: f64) -> ForecastSample {
        ForecastSample {
            cloudiness: 80.0,
            precipitation: Some(mm),
        }
    }

    fn test_palette() -> Palette {
        Palette {
            sunny: ColorStop::new(255, 0, 0),
            cloudy: ColorStop::new(160, 160, 160),
            ..Palette::default()
        }
    }

    #[test]
    fn test_two_sample_ramp() {
        let config = RampConfig {
            window_start: 0,
            window_length: 2,
            steps_per_interval: 3,
        };
        let builder = RampBuilder::new(config).unwrap();
        let palette = test_palette();

        let frame = builder.build(&[dry(0.0), dry(100.0)], &palette).unwrap();

        assert_eq!(frame.len(), 4);
        assert_eq!(frame[0], ColorStop::new(255, 0, 0));
        assert_eq!(frame[3], ColorStop::new(160, 160, 160));
        // 255 + (160 - 255) * 1/3 = 223.33.. -> truncated to 223
        assert_eq!(frame[1].r, 223);
        // 255 + (160 - 255) * 2/3 = 191.66.. -> 191
        assert_eq!(frame[2].r, 191);
    }

    #[test]
    fn test_output_length_default_window() {
        let builder = RampBuilder::new(RampConfig::default()).unwrap();
        let samples: Vec<_> = (0..9).map(|i| dry(i as f64 * 10.0)).collect();

        let frame = builder.build(&samples, &Palette::default()).unwrap();
        // 7 samples, 3 steps per interval: 7 * 3 - 2 = 19
        assert_eq!(frame.len(), 19);
    }

    #[test]
    fn test_window_start_skips_samples() {
        let config = RampConfig {
            window_start: 1,
            window_length: 2,
            steps_per_interval: 2,
        };
        let builder = RampBuilder::new(config).unwrap();
        let palette = test_palette();

        // First sample is outside the window and must not influence output
        let frame = builder
            .build(&[dry(100.0), dry(0.0), dry(0.0)], &palette)
            .unwrap();
        assert!(frame.iter().all(|c| *c == palette.sunny));
    }

    #[test]
    fn test_boundaries_are_exact_base_colors() {
        let config = RampConfig {
            window_start: 0,
            window_length: 4,
            steps_per_interval: 3,
        };
        let builder = RampBuilder::new(config).unwrap();
        let palette = Palette::default();
        let samples = [dry(0.0), rainy(1.5), dry(55.0), rainy(10.0)];

        let frame = builder.build(&samples, &palette).unwrap();
        for (k, sample) in samples.iter().enumerate() {
            assert_eq!(frame[k * 3], base_color(sample, &palette));
        }
    }

    #[test]
    fn test_interpolated_frames_stay_between_boundaries() {
        let config = RampConfig {
            window_start: 0,
            window_length: 3,
            steps_per_interval: 4,
        };
        let builder = RampBuilder::new(config).unwrap();
        let palette = Palette::default();
        let samples = [dry(0.0), rainy(2.0), dry(100.0)];

        let frame = builder.build(&samples, &palette).unwrap();
        for i in 0..frame.len() {
            let (lo, hi) = (i / 4 * 4, (i / 4 * 4 + 4).min(frame.len() - 1));
            for (c, a, b) in [
                (frame[i].r, frame[lo].r, frame[hi].r),
                (frame[i].g, frame[lo].g, frame[hi].g),
                (frame[i].b, frame[lo].b, frame[hi].b),
            ] {
                assert!(c >= a.min(b) && c <= a.max(b));
            }
        }
    }

    #[test]
    fn test_builder_is_pure() {
        let builder = RampBuilder::new(RampConfig::default()).unwrap();
        let palette = Palette::default();
        let samples: Vec<_> = (0..8).map(|i| dry(i as f64 * 12.5)).collect();

        let first = builder.build(&samples, &palette).unwrap();
        let second = builder.build(&samples, &palette).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_insufficient_data() {
        for window_length in 1..6 {
            let config = RampConfig {
                window_start: 1,
                window_length,
                steps_per_interval: 3,
            };
            let builder = RampBuilder::new(config).unwrap();
            let samples: Vec<_> = (0..window_length).map(|_| dry(50.0)).collect();

            // window_length samples is one short of window_start + window_length
            match builder.build(&samples, &Palette::default()) {
                Err(SkystripError::InsufficientData { needed, got }) => {
                    assert_eq!(needed, window_length + 1);
                    assert_eq!(got, window_length);
                }
                other => panic!("expected InsufficientData, got {:?}", other.map(|f| f.len())),
            }
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let no_steps = RampConfig {
            window_start: 1,
            window_length: 7,
            steps_per_interval: 0,
        };
        assert!(RampBuilder::new(no_steps).is_err());

        let no_window = RampConfig {
            window_start: 0,
            window_length: 0,
            steps_per_interval: 3,
        };
        assert!(RampBuilder::new(no_window).is_err());
    }

    #[test]
    fn test_single_sample_window() {
        let config = RampConfig {
            window_start: 0,
            window_length: 1,
            steps_per_interval: 5,
        };
        let builder = RampBuilder::new(config).unwrap();
        let palette = Palette::default();

        // One anchor: exactly one boundary frame, no interpolation possible
        let frame = builder.build(&[dry(40.0)], &palette).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0], base_color(&dry(40.0), &palette));
    }
}
