//! skystrip - a weather-forecast LED strip daemon
//!
//! This is the main entry point for the skystrip daemon.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info};

use skystrip::config::Config;
use skystrip::led::{self, LedStrip, SpiStrip};
use skystrip::owm::OpenWeatherMap;
use skystrip::ramp::{self, FrameBuilder, Palette};
use skystrip::scheduler::{shutdown_token, Scheduler};
use skystrip::selector::{CitySelector, SysfsSwitch};
use skystrip::{log_error, Result};

/// How long a `--once` invocation keeps the frame lit before exiting
const ONCE_HOLD: Duration = Duration::from_secs(10);

/// Everything one render cycle needs
struct App {
    owm: OpenWeatherMap,
    builder: Box<dyn FrameBuilder>,
    palette: Palette,
    strip: Box<dyn LedStrip>,
    selector: CitySelector,
    /// CLI city override; bypasses the switch bank when set
    fixed_city: Option<String>,
}

impl App {
    /// One cycle: resolve the city, fetch, build the frame, render it.
    async fn tick(&mut self) -> Result<()> {
        let city = match &self.fixed_city {
            Some(city) => city.clone(),
            None => self.selector.current()?.to_string(),
        };

        let forecast = self.owm.fetch_forecast(&city).await?;
        let samples = forecast.samples();
        let frame = self.builder.build(&samples, &self.palette)?;

        info!(
            city = %forecast.city.name,
            samples = samples.len(),
            frames = frame.len(),
            mode = self.builder.name(),
            "Rendering forecast"
        );

        led::send(self.strip.as_mut(), &frame)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (tracing is not up yet, so failures go to stderr
    // through the error return)
    let (config, args) = Config::load()?;

    skystrip::init_tracing(&config.log_level);
    info!("Starting skystrip v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let palette = config.build_palette()?;
    let builder = ramp::get_builder(&config.ramp.mode, config.ramp_config(), config.led.count)?;

    let strip = SpiStrip::open(&config.led.device, config.led.count).map_err(|e| {
        error!("Failed to open LED strip: {}", e);
        e
    })?;

    let mut selector = CitySelector::new(config.selector.default_city.as_str());
    if args.city.is_none() {
        for binding in &config.selector.switches {
            selector.bind(
                Box::new(SysfsSwitch::open(binding.pin)?),
                binding.city.as_str(),
            );
        }
    }

    let app = Rc::new(RefCell::new(App {
        owm: OpenWeatherMap::new(args.api_key.clone()),
        builder,
        palette,
        strip: Box::new(strip),
        selector,
        fixed_city: args.city.clone(),
    }));

    let run_result = if args.once {
        let result = app.borrow_mut().tick().await;
        if result.is_ok() {
            tokio::time::sleep(ONCE_HOLD).await;
        }
        result
    } else {
        let (shutdown_tx, shutdown_rx) = shutdown_token();
        tokio::spawn(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        });

        let scheduler = Scheduler::new(
            Duration::from_secs(config.poll_interval_secs),
            shutdown_rx,
        );

        let tick_app = Rc::clone(&app);
        scheduler
            .run(move || {
                let app = Rc::clone(&tick_app);
                async move { app.borrow_mut().tick().await }
            })
            .await
    };

    // Leave the hardware dark no matter how the loop ended
    if let Err(e) = app.borrow_mut().strip.clear() {
        log_error(&e, "clearing strip on shutdown");
    }

    match &run_result {
        Ok(()) => info!("skystrip stopped"),
        Err(e) => log_error(e, "render loop"),
    }
    run_result
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
