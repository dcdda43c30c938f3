//! Shared domain models (coordinates, weather snapshots).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Geographic coordinate.
///
/// Equality is exact coordinate match; there is no proximity threshold.
/// "Location not yet resolved" is expressed as `Option<LatLng>::None`, not
/// as a magic value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Conditions observed at a single point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherSnapshot {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    /// WMO weather interpretation code.
    pub weather_code: u8,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    /// Observation time in the location's local timezone, when reported.
    pub observed_at: Option<NaiveDateTime>,
}

/// One hour of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub weather_code: u8,
    pub condition: String,
}

/// Hourly forecast; `today` covers the remaining hours of the current day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyCollection {
    pub today: Vec<HourlyEntry>,
}

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub weather_code: u8,
    pub condition: String,
    pub wind_speed_kmh: f64,
    pub uv_index: Option<f64>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

/// Multi-day forecast, one entry per day in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyCollection {
    pub days: Vec<DailyEntry>,
}

/// Human-readable place description from reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: String,
}
