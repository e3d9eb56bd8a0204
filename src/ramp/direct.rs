//! Direct 1:1 sample-to-LED mapper.
//!
//! The degenerate strategy: no window, no interpolation, each of the first
//! N forecast samples lights one LED. Trades smoothness for a literal
//! reading of the feed.

use super::{base_color, ColorStop, ForecastSample, FrameBuilder, Palette};
use crate::error::Result;

/// Hours covered by one reporting interval of the forecast feed
const REPORTING_INTERVAL_HOURS: f64 = 3.0;

/// Non-interpolating frame builder
pub struct DirectMapper {
    led_count: usize,
}

impl DirectMapper {
    pub fn new(led_count: usize) -> Self {
        Self { led_count }
    }
}

impl FrameBuilder for DirectMapper {
    /// Maps `min(led_count, samples.len())` samples straight onto LEDs.
    /// A strip longer than the forecast is truncated silently; that is the
    /// documented contract, not an error.
    fn build(&self, samples: &[ForecastSample], palette: &Palette) -> Result<Vec<ColorStop>> {
        Ok(samples
            .iter()
            .take(self.led_count)
            .map(|sample| {
                // The feed reports cumulative 3-hour volumes; normalize to
                // an hourly-equivalent rate before the saturation fraction.
                let hourly = ForecastSample {
                    cloudiness: sample.cloudiness,
                    precipitation: sample
                        .precipitation
                        .map(|mm| mm / REPORTING_INTERVAL_HOURS),
                };
                base_color(&hourly, palette)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ramp::lerp_color;

    fn dry(cloudiness: f64) -> ForecastSample {
        ForecastSample {
            cloudiness,
            precipitation: None,
        }
    }

    #[test]
    fn test_one_led_per_sample() {
        let mapper = DirectMapper::new(4);
        let palette = Palette::default();
        let samples = [dry(0.0), dry(50.0), dry(100.0), dry(25.0)];

        let frame = mapper.build(&samples, &palette).unwrap();
        assert_eq!(frame.len(), 4);
        assert_eq!(frame[0], palette.sunny);
        assert_eq!(frame[2], palette.cloudy);
    }

    #[test]
    fn test_truncates_to_led_count() {
        let mapper = DirectMapper::new(2);
        let samples = [dry(0.0), dry(10.0), dry(20.0), dry(30.0)];

        let frame = mapper.build(&samples, &Palette::default()).unwrap();
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_short_forecast_truncates_silently() {
        let mapper = DirectMapper::new(15);
        let samples = [dry(0.0), dry(100.0)];

        let frame = mapper.build(&samples, &Palette::default()).unwrap();
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_rain_normalized_to_hourly_rate() {
        let mapper = DirectMapper::new(1);
        let palette = Palette::default();
        let sample = ForecastSample {
            cloudiness: 0.0,
            precipitation: Some(6.0),
        };

        let frame = mapper.build(&[sample], &palette).unwrap();
        // 6 mm over 3 h -> 2 mm/h, fraction = min(2 * 0.3, 1) = 0.6
        let expected = lerp_color(palette.rain_light, palette.rain_heavy, 0.6);
        assert_eq!(frame[0], expected);
    }
}
