//! # skystrip
//!
//! A weather-forecast LED strip daemon for the Raspberry Pi.
//!
//! skystrip polls the OpenWeatherMap 5-day/3-hour forecast and paints the
//! coming day onto an addressable LED strip: red for clear sky fading into
//! grey as clouds move in, grey fading into blue as rain gets heavier. A
//! bank of physical switches can select which city is shown.
//!
//! ## Architecture
//!
//! - **Forecast layer** ([`owm`]): typed OpenWeatherMap client
//! - **Core** ([`ramp`]): pure forecast-to-color mapping, windowed
//!   interpolating ramp or direct 1:1 mode
//! - **Hardware layer** ([`led`], [`selector`]): WS2812-over-SPI strip
//!   driver and sysfs GPIO switches
//! - **Orchestration** ([`scheduler`]): fixed-period polling loop with
//!   cancellation, strip cleared on the way out

pub mod config;
pub mod error;
pub mod led;
pub mod logging;
pub mod owm;
pub mod ramp;
pub mod scheduler;
pub mod selector;

pub use config::Config;
pub use error::{Result, SkystripError};
pub use logging::{init_tracing, log_error};
pub use ramp::{ColorStop, ForecastSample, FrameBuilder, Palette};
