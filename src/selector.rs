//! Physical-switch city selection.
//!
//! A bank of toggle switches picks which city's forecast is rendered. The
//! switches are polled every cycle; the first active one wins and an all-off
//! bank falls back to the configured default city. No debouncing: the poll
//! interval is minutes, not milliseconds.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SkystripError};

/// Trait for a polled on/off input
pub trait Switch {
    fn is_on(&self) -> Result<bool>;
}

/// A GPIO input pin exposed through the Linux sysfs interface.
pub struct SysfsSwitch {
    pin: u32,
    value_path: PathBuf,
}

impl SysfsSwitch {
    /// Export the pin (if not already exported) and configure it as input.
    pub fn open(pin: u32) -> Result<Self> {
        let gpio_dir = PathBuf::from(format!("/sys/class/gpio/gpio{}", pin));

        if !gpio_dir.exists() {
            fs::write("/sys/class/gpio/export", pin.to_string()).map_err(|e| {
                SkystripError::Gpio {
                    message: format!("Failed to export GPIO pin {}: {}", pin, e),
                }
            })?;
        }

        fs::write(gpio_dir.join("direction"), "in").map_err(|e| SkystripError::Gpio {
            message: format!("Failed to set GPIO pin {} as input: {}", pin, e),
        })?;

        debug!(pin, "Opened GPIO switch");

        Ok(Self {
            pin,
            value_path: gpio_dir.join("value"),
        })
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }
}

impl Switch for SysfsSwitch {
    fn is_on(&self) -> Result<bool> {
        let raw = fs::read_to_string(&self.value_path).map_err(|e| SkystripError::Gpio {
            message: format!("Failed to read GPIO pin {}: {}", self.pin, e),
        })?;
        Ok(raw.trim() == "1")
    }
}

/// A sysfs switch reading from an arbitrary path, for tests.
pub struct FileSwitch {
    value_path: PathBuf,
}

impl FileSwitch {
    pub fn new(value_path: impl AsRef<Path>) -> Self {
        Self {
            value_path: value_path.as_ref().to_path_buf(),
        }
    }
}

impl Switch for FileSwitch {
    fn is_on(&self) -> Result<bool> {
        Ok(fs::read_to_string(&self.value_path)?.trim() == "1")
    }
}

/// Maps the switch bank onto city names.
pub struct CitySelector {
    bindings: Vec<(Box<dyn Switch>, String)>,
    default_city: String,
}

impl CitySelector {
    pub fn new(default_city: impl Into<String>) -> Self {
        Self {
            bindings: Vec::new(),
            default_city: default_city.into(),
        }
    }

    /// Bind a switch to a city. Earlier bindings take precedence.
    pub fn bind(&mut self, switch: Box<dyn Switch>, city: impl Into<String>) {
        self.bindings.push((switch, city.into()));
    }

    /// The city of the first active switch, or the default when none is on.
    pub fn current(&self) -> Result<&str> {
        for (switch, city) in &self.bindings {
            if switch.is_on()? {
                return Ok(city);
            }
        }
        Ok(&self.default_city)
    }
}
