//! Open-Meteo forecast client.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use futures::stream;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::domain::model::{
    CurrentWeatherSnapshot, DailyCollection, DailyEntry, HourlyCollection, HourlyEntry, LatLng,
};
use crate::domain::usecase::{
    CurrentWeatherSource, DailyWeatherSource, DataStream, HourlyWeatherSource,
};
use crate::error::WeatherError;

use super::check_status;

const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,uv_index_max,wind_speed_10m_max";

/// Forecast client for the Open-Meteo HTTP API. Cloning shares the
/// connection pool.
#[derive(Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::new(http, config.forecast_base_url.clone()))
    }

    async fn fetch(&self, location: LatLng, extra: &[(&str, &str)]) -> Result<ForecastResponse, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);
        debug!(%location, %url, "requesting forecast");
        let mut request = self.http.get(&url).query(&[
            ("latitude", location.latitude.to_string().as_str()),
            ("longitude", location.longitude.to_string().as_str()),
            ("timezone", "auto"),
        ]);
        for pair in extra {
            request = request.query(&[*pair]);
        }
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn fetch_current(&self, location: LatLng) -> Result<CurrentWeatherSnapshot, WeatherError> {
        let body = self.fetch(location, &[("current", CURRENT_FIELDS)]).await?;
        body.current
            .map(CurrentBlock::into_snapshot)
            .ok_or_else(|| WeatherError::other("forecast response missing current block"))
    }

    async fn fetch_hourly(&self, location: LatLng) -> Result<HourlyCollection, WeatherError> {
        let body = self
            .fetch(location, &[("hourly", HOURLY_FIELDS), ("forecast_days", "2")])
            .await?;
        body.hourly
            .map(HourlyBlock::into_collection)
            .ok_or_else(|| WeatherError::other("forecast response missing hourly block"))
    }

    async fn fetch_daily(&self, location: LatLng) -> Result<DailyCollection, WeatherError> {
        let body = self
            .fetch(location, &[("daily", DAILY_FIELDS), ("forecast_days", "7")])
            .await?;
        body.daily
            .map(DailyBlock::into_collection)
            .ok_or_else(|| WeatherError::other("forecast response missing daily block"))
    }
}

impl CurrentWeatherSource for OpenMeteoClient {
    fn current_weather(&self, location: LatLng) -> DataStream<CurrentWeatherSnapshot> {
        let client = self.clone();
        stream::once(async move { client.fetch_current(location).await }).boxed()
    }
}

impl HourlyWeatherSource for OpenMeteoClient {
    fn hourly_weather(&self, location: LatLng) -> DataStream<HourlyCollection> {
        let client = self.clone();
        stream::once(async move { client.fetch_hourly(location).await }).boxed()
    }
}

impl DailyWeatherSource for OpenMeteoClient {
    fn daily_weather(&self, location: LatLng) -> DataStream<DailyCollection> {
        let client = self.clone();
        stream::once(async move { client.fetch_daily(location).await }).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
    hourly: Option<HourlyBlock>,
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: u8,
    weather_code: u8,
    wind_speed_10m: f64,
}

impl CurrentBlock {
    fn into_snapshot(self) -> CurrentWeatherSnapshot {
        CurrentWeatherSnapshot {
            temperature_c: self.temperature_2m,
            feels_like_c: self.apparent_temperature,
            weather_code: self.weather_code,
            condition: condition_label(self.weather_code).to_string(),
            humidity_pct: self.relative_humidity_2m,
            wind_speed_kmh: self.wind_speed_10m,
            observed_at: parse_time(&self.time),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weather_code: Vec<u8>,
}

impl HourlyBlock {
    /// Keep the entries belonging to the first reported day; the API is
    /// asked for two days so late-evening requests still show a full list.
    fn into_collection(self) -> HourlyCollection {
        let mut today = Vec::new();
        let mut first_day: Option<NaiveDate> = None;

        for (i, raw) in self.time.iter().enumerate() {
            let Some(time) = parse_time(raw) else {
                continue;
            };
            let day = *first_day.get_or_insert_with(|| time.date());
            if time.date() != day {
                break;
            }
            let weather_code = self.weather_code.get(i).copied().unwrap_or_default();
            today.push(HourlyEntry {
                time,
                temperature_c: self.temperature_2m.get(i).copied().unwrap_or_default(),
                weather_code,
                condition: condition_label(weather_code).to_string(),
            });
        }

        HourlyCollection { today }
    }
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<u8>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
    uv_index_max: Option<Vec<f64>>,
    wind_speed_10m_max: Vec<f64>,
}

impl DailyBlock {
    fn into_collection(self) -> DailyCollection {
        let mut days = Vec::with_capacity(self.time.len());
        for (i, raw) in self.time.iter().enumerate() {
            let Some(date) = parse_date(raw) else {
                continue;
            };
            let weather_code = self.weather_code.get(i).copied().unwrap_or_default();
            days.push(DailyEntry {
                date,
                temp_min_c: self.temperature_2m_min.get(i).copied().unwrap_or_default(),
                temp_max_c: self.temperature_2m_max.get(i).copied().unwrap_or_default(),
                weather_code,
                condition: condition_label(weather_code).to_string(),
                wind_speed_kmh: self.wind_speed_10m_max.get(i).copied().unwrap_or_default(),
                uv_index: self.uv_index_max.as_ref().and_then(|v| v.get(i)).copied(),
                sunrise: self.sunrise.get(i).and_then(|s| parse_time(s)),
                sunset: self.sunset.get(i).and_then(|s| parse_time(s)),
            });
        }
        DailyCollection { days }
    }
}

fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// WMO weather interpretation codes.
pub fn condition_label(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
