//! Configuration management for skystrip.
//!
//! This module handles the layered configuration system with the following
//! precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SkystripError};
use crate::ramp::builder::RampConfig;
use crate::ramp::{ColorStop, Palette};

/// Command-line arguments for skystrip
#[derive(Parser, Debug)]
#[command(name = "skystrip")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// City to render, overriding the switch selector
    pub city: Option<String>,

    /// OpenWeatherMap API key
    #[arg(short = 'k', long, env = "OPEN_WEATHER_MAP_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Path to JSON configuration file
    #[arg(short, long, env = "SKYSTRIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seconds between forecast refreshes
    #[arg(short, long, env = "SKYSTRIP_INTERVAL")]
    pub interval: Option<u64>,

    /// Render mode (ramp, direct)
    #[arg(short, long, env = "SKYSTRIP_MODE")]
    pub mode: Option<String>,

    /// Fetch and render a single frame, then exit
    #[arg(long)]
    pub once: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SKYSTRIP_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// LED strip configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedConfig {
    /// SPI character device driving the strip
    #[serde(default = "default_led_device")]
    pub device: String,

    /// Number of LEDs on the strip
    #[serde(default = "default_led_count")]
    pub count: usize,
}

/// Ramp construction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RampSettings {
    /// First forecast sample of the window
    #[serde(default = "default_window_start")]
    pub window_start: usize,

    /// Number of forecast samples in the window
    #[serde(default = "default_window_length")]
    pub window_length: usize,

    /// Output colors per sample interval
    #[serde(default = "default_steps_per_interval")]
    pub steps_per_interval: usize,

    /// Render mode: "ramp" or "direct"
    #[serde(default = "default_mode")]
    pub mode: String,
}

/// Palette configuration, colors as `#rrggbb` strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_sunny")]
    pub sunny: String,

    #[serde(default = "default_cloudy")]
    pub cloudy: String,

    #[serde(default = "default_cloudy")]
    pub rain_light: String,

    #[serde(default = "default_rain_heavy")]
    pub rain_heavy: String,

    /// Multiplier from mm of rain to interpolation fraction
    #[serde(default = "default_rain_saturation")]
    pub rain_saturation: f64,
}

/// One switch-to-city binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchBinding {
    /// BCM pin number of the switch
    pub pin: u32,
    /// City rendered while this switch is on
    pub city: String,
}

/// City selector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// City rendered when no switch is active
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Switch bank, highest priority first
    #[serde(default)]
    pub switches: Vec<SwitchBinding>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LED strip configuration
    #[serde(default)]
    pub led: LedConfig,

    /// Ramp configuration
    #[serde(default)]
    pub ramp: RampSettings,

    /// Palette configuration
    #[serde(default)]
    pub palette: PaletteConfig,

    /// City selector configuration
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Seconds between forecast refreshes
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Args)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args))
    }

    /// Build the configuration for already-parsed arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(interval) = args.interval {
            config.poll_interval_secs = interval;
        }
        if let Some(mode) = &args.mode {
            config.ramp.mode = mode.clone();
        }
        if let Some(log_level) = &args.log_level {
            config.log_level = log_level.clone();
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.led = other.led;
        self.ramp = other.ramp;
        self.palette = other.palette;
        self.selector = other.selector;
        self.poll_interval_secs = other.poll_interval_secs;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.led.count == 0 {
            return Err(SkystripError::Config {
                message: "LED count cannot be 0".to_string(),
            });
        }

        if self.ramp.window_length == 0 || self.ramp.steps_per_interval == 0 {
            return Err(SkystripError::Config {
                message: "Ramp window_length and steps_per_interval must be at least 1"
                    .to_string(),
            });
        }

        match self.ramp.mode.as_str() {
            "ramp" | "direct" => {}
            _ => {
                return Err(SkystripError::Config {
                    message: format!(
                        "Invalid render mode: {}. Must be one of: ramp, direct",
                        self.ramp.mode
                    ),
                });
            }
        }

        if self.selector.default_city.is_empty() {
            return Err(SkystripError::Config {
                message: "Default city cannot be empty".to_string(),
            });
        }

        if self.poll_interval_secs == 0 {
            return Err(SkystripError::Config {
                message: "Poll interval cannot be 0".to_string(),
            });
        }

        if self.palette.rain_saturation <= 0.0 {
            return Err(SkystripError::Config {
                message: "rain_saturation must be positive".to_string(),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(SkystripError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // Palette colors must parse
        self.build_palette()?;

        Ok(())
    }

    /// The window settings as a core [`RampConfig`]
    pub fn ramp_config(&self) -> RampConfig {
        RampConfig {
            window_start: self.ramp.window_start,
            window_length: self.ramp.window_length,
            steps_per_interval: self.ramp.steps_per_interval,
        }
    }

    /// Parse the palette color strings into a core [`Palette`]
    pub fn build_palette(&self) -> Result<Palette> {
        Ok(Palette {
            sunny: parse_color(&self.palette.sunny)?,
            cloudy: parse_color(&self.palette.cloudy)?,
            rain_light: parse_color(&self.palette.rain_light)?,
            rain_heavy: parse_color(&self.palette.rain_heavy)?,
            rain_saturation: self.palette.rain_saturation,
        })
    }
}

/// Parse a `#rrggbb` color string into its three channels
pub fn parse_color(value: &str) -> Result<ColorStop> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    let invalid = || SkystripError::InvalidConfig {
        message: format!(
            "Invalid palette color {:?}: expected #rrggbb with exactly 3 channels",
            value
        ),
    };

    if hex.len() != 6 {
        return Err(invalid());
    }
    let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;

    Ok(ColorStop::new(
        ((packed >> 16) & 0xff) as i32,
        ((packed >> 8) & 0xff) as i32,
        (packed & 0xff) as i32,
    ))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            led: LedConfig::default(),
            ramp: RampSettings::default(),
            palette: PaletteConfig::default(),
            selector: SelectorConfig::default(),
            poll_interval_secs: default_poll_interval(),
            log_level: default_log_level(),
        }
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            device: default_led_device(),
            count: default_led_count(),
        }
    }
}

impl Default for RampSettings {
    fn default() -> Self {
        Self {
            window_start: default_window_start(),
            window_length: default_window_length(),
            steps_per_interval: default_steps_per_interval(),
            mode: default_mode(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            sunny: default_sunny(),
            cloudy: default_cloudy(),
            rain_light: default_cloudy(),
            rain_heavy: default_rain_heavy(),
            rain_saturation: default_rain_saturation(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            switches: Vec::new(),
        }
    }
}

// Default value functions for serde
fn default_led_device() -> String {
    "/dev/spidev0.0".to_string()
}

fn default_led_count() -> usize {
    15
}

fn default_window_start() -> usize {
    1
}

fn default_window_length() -> usize {
    7
}

fn default_steps_per_interval() -> usize {
    3
}

fn default_mode() -> String {
    "ramp".to_string()
}

fn default_sunny() -> String {
    "#ff0000".to_string()
}

fn default_cloudy() -> String {
    "#a0a0a0".to_string()
}

fn default_rain_heavy() -> String {
    "#0000ff".to_string()
}

fn default_rain_saturation() -> f64 {
    0.3
}

fn default_city() -> String {
    "Kyoto".to_string()
}

fn default_poll_interval() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}
