//! OpenWeatherMap forecast client and response model.
//!
//! Fetches the 5-day/3-hour forecast (https://openweathermap.org/forecast5)
//! and decodes it into typed values: temperatures in Celsius, timestamps as
//! UTC datetimes, rain/snow volumes optional. No retries and no validation
//! beyond typed field access; a bad response surfaces as a decode error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SkystripError};
use crate::ramp::ForecastSample;

/// Default API endpoint
pub const API_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/";

/// Convert a Kelvin reading to Celsius
pub fn celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

/// City information attached to a forecast response
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    /// Shift in seconds from UTC
    pub timezone: i64,
}

/// One weather condition entry (group like "Rain", "Clouds" plus detail)
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub id: i64,
    pub group: String,
    pub description: String,
}

/// One 3-hourly forecast entry, units already converted
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub conditions: Vec<Condition>,
    /// Temperature in Celsius
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    /// Atmospheric pressure at sea level [hPa]
    pub pressure: f64,
    /// Humidity [%]
    pub humidity: f64,
    /// Cloudiness [%]
    pub cloudiness: f64,
    /// Wind speed [m/s]
    pub wind_speed: f64,
    /// Wind direction [degrees]
    pub wind_direction: f64,
    /// Rain volume [mm] over the 3-hour interval, if any
    pub rain_3h: Option<f64>,
    /// Snow volume [mm] over the 3-hour interval, if any
    pub snow_3h: Option<f64>,
}

impl Observation {
    /// Reduce this entry to what the color mapping consumes
    pub fn to_sample(&self) -> ForecastSample {
        ForecastSample {
            cloudiness: self.cloudiness,
            precipitation: self.rain_3h,
        }
    }
}

/// A decoded forecast response
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub city: City,
    pub observations: Vec<Observation>,
}

impl Forecast {
    /// The forecast reduced to color-mapping samples, in time order
    pub fn samples(&self) -> Vec<ForecastSample> {
        self.observations.iter().map(Observation::to_sample).collect()
    }
}

// Wire-format structs, kept private to this module.

#[derive(Debug, Deserialize)]
struct ApiResponse {
    city: ApiCity,
    list: Vec<ApiEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiCity {
    id: i64,
    name: String,
    coord: ApiCoord,
    country: String,
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct ApiCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    dt: i64,
    main: ApiMain,
    weather: Vec<ApiCondition>,
    clouds: ApiClouds,
    wind: ApiWind,
    rain: Option<ApiVolume>,
    snow: Option<ApiVolume>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    id: i64,
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct ApiVolume {
    #[serde(rename = "3h")]
    volume_3h: Option<f64>,
}

fn convert_entry(entry: ApiEntry) -> Result<Observation> {
    let timestamp =
        DateTime::<Utc>::from_timestamp(entry.dt, 0).ok_or_else(|| SkystripError::Api {
            message: format!("Forecast entry has invalid timestamp: {}", entry.dt),
        })?;

    Ok(Observation {
        timestamp,
        conditions: entry
            .weather
            .into_iter()
            .map(|c| Condition {
                id: c.id,
                group: c.main,
                description: c.description,
            })
            .collect(),
        temperature: celsius(entry.main.temp),
        temperature_min: celsius(entry.main.temp_min),
        temperature_max: celsius(entry.main.temp_max),
        pressure: entry.main.pressure,
        humidity: entry.main.humidity,
        cloudiness: entry.clouds.all,
        wind_speed: entry.wind.speed,
        wind_direction: entry.wind.deg,
        rain_3h: entry.rain.and_then(|r| r.volume_3h),
        snow_3h: entry.snow.and_then(|s| s.volume_3h),
    })
}

fn convert_response(response: ApiResponse) -> Result<Forecast> {
    Ok(Forecast {
        city: City {
            id: response.city.id,
            name: response.city.name,
            latitude: response.city.coord.lat,
            longitude: response.city.coord.lon,
            country: response.city.country,
            timezone: response.city.timezone,
        },
        observations: response
            .list
            .into_iter()
            .map(convert_entry)
            .collect::<Result<_>>()?,
    })
}

/// OpenWeatherMap request helper
pub struct OpenWeatherMap {
    client: reqwest::Client,
    key: String,
    endpoint: String,
}

impl OpenWeatherMap {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            key: key.into(),
            endpoint: API_ENDPOINT.to_string(),
        }
    }

    /// Override the API endpoint (used by tests against a local server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Fetch the 5-day/3-hour forecast for a city by name
    pub async fn fetch_forecast(&self, city_name: &str) -> Result<Forecast> {
        let url = format!("{}forecast", self.endpoint);
        debug!(city = city_name, url = %url, "Requesting forecast");

        let response = self
            .client
            .get(&url)
            .query(&[("q", city_name), ("APPID", self.key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let decoded: ApiResponse = response.json().await?;
        let forecast = convert_response(decoded)?;

        debug!(
            city = %forecast.city.name,
            entries = forecast.observations.len(),
            "Forecast fetched"
        );
        Ok(forecast)
    }
}

/// Decode a raw forecast JSON document (the body of a `forecast` response)
pub fn parse_forecast(json: &str) -> Result<Forecast> {
    let decoded: ApiResponse = serde_json::from_str(json)?;
    convert_response(decoded)
}
