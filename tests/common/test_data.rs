//! Builders for synthetic OpenWeatherMap forecast responses.

use serde_json::json;

/// One synthetic 3-hourly entry: cloudiness percentage and optional rain
/// volume in mm over the interval.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub cloudiness: f64,
    pub rain_3h: Option<f64>,
}

pub fn dry(cloudiness: f64) -> Entry {
    Entry {
        cloudiness,
        rain_3h: None,
    }
}

pub fn rainy(cloudiness: f64, rain_3h: f64) -> Entry {
    Entry {
        cloudiness,
        rain_3h: Some(rain_3h),
    }
}

/// Render a forecast response body the way the OWM `forecast` endpoint
/// would, with entries spaced 3 hours apart.
pub fn forecast_json(city: &str, entries: &[Entry]) -> String {
    let list: Vec<_> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut item = json!({
                "dt": 1_756_857_600_i64 + i as i64 * 3 * 3600,
                "main": {
                    "temp": 293.15,
                    "temp_min": 292.15,
                    "temp_max": 294.15,
                    "pressure": 1008.0,
                    "humidity": 70.0
                },
                "weather": [
                    {"id": 801, "main": "Clouds", "description": "few clouds"}
                ],
                "clouds": {"all": entry.cloudiness},
                "wind": {"speed": 3.0, "deg": 120.0}
            });
            if let Some(rain) = entry.rain_3h {
                item["rain"] = json!({ "3h": rain });
            }
            item
        })
        .collect();

    json!({
        "city": {
            "id": 1857910,
            "name": city,
            "coord": {"lat": 35.0211, "lon": 135.7538},
            "country": "JP",
            "timezone": 32400
        },
        "list": list
    })
    .to_string()
}
