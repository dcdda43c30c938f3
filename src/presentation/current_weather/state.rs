use crate::domain::model::{CurrentWeatherSnapshot, HourlyEntry};
use crate::error::WeatherError;
use crate::presentation::viewmodel::ScreenState;

/// Snapshot of the current-weather screen.
///
/// At most one of `is_loading`/`is_refresh` is true while a fetch runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentWeatherViewState {
    pub is_loading: bool,
    pub is_refresh: bool,
    pub error: Option<WeatherError>,
    pub current_weather: Option<CurrentWeatherSnapshot>,
    pub hourly_today: Vec<HourlyEntry>,
}

impl ScreenState for CurrentWeatherViewState {
    fn error(&self) -> Option<&WeatherError> {
        self.error.as_ref()
    }

    fn set_error(&mut self, error: Option<WeatherError>) {
        self.error = error;
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_refreshing(&mut self, refreshing: bool) {
        self.is_refresh = refreshing;
    }

    fn clear_busy(&mut self) {
        self.is_loading = false;
        self.is_refresh = false;
    }
}
