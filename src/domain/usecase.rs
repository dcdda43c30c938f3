//! Use-case seams consumed by the view-models.
//!
//! One interface per use-case, each exposing a single typed operation that
//! produces a lazy result stream. View-models receive implementations via
//! explicit constructor parameters; concrete clients live in [`crate::data`].

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::model::{
    Address, CurrentWeatherSnapshot, DailyCollection, HourlyCollection, LatLng,
};
use crate::error::WeatherError;

/// Lazy result sequence produced by a use-case.
///
/// Most implementations emit a single value and end; consumers must
/// tolerate any number of emissions before termination.
pub type DataStream<T> = BoxStream<'static, Result<T, WeatherError>>;

/// Conditions observed right now at a coordinate.
pub trait CurrentWeatherSource: Send + Sync {
    fn current_weather(&self, location: LatLng) -> DataStream<CurrentWeatherSnapshot>;
}

/// Hour-by-hour forecast for a coordinate.
pub trait HourlyWeatherSource: Send + Sync {
    fn hourly_weather(&self, location: LatLng) -> DataStream<HourlyCollection>;
}

/// Seven-day forecast for a coordinate.
pub trait DailyWeatherSource: Send + Sync {
    fn daily_weather(&self, location: LatLng) -> DataStream<DailyCollection>;
}

/// The device's (or the deployment's) own position.
pub trait LocationSource: Send + Sync {
    fn current_location(&self) -> DataStream<LatLng>;
}

/// Free-text address to coordinate.
pub trait Geocoder: Send + Sync {
    fn location_from_text(&self, address: &str) -> DataStream<LatLng>;
}

/// Coordinate to human-readable address.
pub trait ReverseGeocoder: Send + Sync {
    fn address_from_location(&self, location: LatLng) -> DataStream<Address>;
}

/// Persisted map-style preference.
///
/// `dark_mode` replays the current value to each new subscriber and then
/// streams every later change, so a screen observes edits made elsewhere.
#[async_trait]
pub trait MapStylePreferences: Send + Sync {
    fn dark_mode(&self) -> DataStream<bool>;

    async fn set_dark_mode(&self, enabled: bool) -> Result<(), WeatherError>;
}
