use serde::{Deserialize, Serialize};

use crate::domain::model::LatLng;

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationDefaults,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Fallback coordinate used until a real location is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDefaults {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Label shown while the fallback coordinate is in use.
    #[serde(default = "default_label")]
    pub label: String,
}

impl LocationDefaults {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// Event-channel sizing shared by every view-model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Bounded capacity of each view-model's event queue.
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

/// Endpoints and HTTP behavior of the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    #[serde(default = "default_reverse_geocoding_base_url")]
    pub reverse_geocoding_base_url: String,
    /// Sent as User-Agent; the reverse-geocoding service requires one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_latitude() -> f64 {
    21.0278 // Hanoi
}

fn default_longitude() -> f64 {
    105.8342
}

fn default_label() -> String {
    "Hanoi, Vietnam".to_string()
}

fn default_event_capacity() -> usize {
    16
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_reverse_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    concat!("skycast/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: LocationDefaults::default(),
            events: EventsConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for LocationDefaults {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            label: default_label(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            reverse_geocoding_base_url: default_reverse_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}
