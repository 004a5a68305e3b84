use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::{FetchError, truncate_body},
    model::{Coordinates, UnitSystem, WeatherSnapshot},
};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// A source of current conditions for a named city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, city: &str, units: UnitSystem) -> Result<WeatherSnapshot, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_WEATHER_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn current(&self, city: &str, units: UnitSystem) -> Result<WeatherSnapshot, FetchError> {
        tracing::debug!(city, units = units.as_str(), "fetching current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("units", units.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("weather request failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("failed to read weather body: {e}")))?;

        if !status.is_success() {
            // OpenWeather error bodies carry a human-readable `message`.
            return Err(FetchError::FetchFailed(format!(
                "status {}: {}",
                status,
                error_text(&body)
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(format!("weather JSON: {e}")))?;

        Ok(snapshot_from(parsed))
    }
}

fn error_text(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn snapshot_from(parsed: OwCurrentResponse) -> WeatherSnapshot {
    let (condition, description) = parsed
        .weather
        .first()
        .map(|w| (w.main.clone(), w.description.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));

    let observation_time =
        DateTime::<Utc>::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now);

    WeatherSnapshot {
        condition,
        description,
        humidity_pct: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        temperature: parsed.main.temp,
        pressure_hpa: parsed.main.pressure,
        coordinates: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
        observation_time,
    }
}

#[derive(Debug, Deserialize)]
struct OwWeatherEntry {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    weather: Vec<OwWeatherEntry>,
    main: OwMain,
    wind: OwWind,
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}
