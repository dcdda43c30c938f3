//! Forward and reverse geocoding clients.

use std::time::Duration;

use futures::stream;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::domain::model::{Address, LatLng};
use crate::domain::usecase::{DataStream, Geocoder, ReverseGeocoder};
use crate::error::WeatherError;

use super::check_status;

fn build_client(config: &ApiConfig) -> Result<Client, WeatherError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?)
}

/// Free-text address lookup against the Open-Meteo geocoding API.
#[derive(Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(
            build_client(config)?,
            config.geocoding_base_url.clone(),
        ))
    }

    async fn lookup(&self, query: &str) -> Result<LatLng, WeatherError> {
        let url = format!(
            "{}/v1/search?name={}&count=1&language=en",
            self.base_url,
            urlencoding::encode(query)
        );
        debug!(%query, "geocoding address");
        let response = check_status(self.http.get(&url).send().await?).await?;
        let body: GeocodingResponse = response.json().await?;

        body.results
            .and_then(|results| results.into_iter().next())
            .map(|result| LatLng::new(result.latitude, result.longitude))
            .ok_or_else(|| WeatherError::AddressNotFound {
                query: query.to_string(),
            })
    }
}

impl Geocoder for OpenMeteoGeocoder {
    fn location_from_text(&self, address: &str) -> DataStream<LatLng> {
        let client = self.clone();
        let query = address.to_owned();
        stream::once(async move { client.lookup(&query).await }).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

/// Coordinate-to-address lookup against a Nominatim-compatible API.
#[derive(Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(
            build_client(config)?,
            config.reverse_geocoding_base_url.clone(),
        ))
    }

    async fn lookup(&self, location: LatLng) -> Result<Address, WeatherError> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}",
            self.base_url, location.latitude, location.longitude
        );
        debug!(%location, "reverse geocoding");
        let response = check_status(self.http.get(&url).send().await?).await?;
        let body: ReverseResponse = response.json().await?;

        body.display_name
            .map(|display_name| Address { display_name })
            .ok_or_else(|| WeatherError::other(format!("no address found for {location}")))
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn address_from_location(&self, location: LatLng) -> DataStream<Address> {
        let client = self.clone();
        stream::once(async move { client.lookup(location).await }).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}
