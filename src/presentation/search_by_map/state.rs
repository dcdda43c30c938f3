use crate::domain::model::LatLng;
use crate::error::WeatherError;
use crate::presentation::viewmodel::ScreenState;

/// Snapshot of the search-by-map screen. No pull-to-refresh here, so the
/// default `set_refreshing` no-op applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchByMapViewState {
    pub is_loading: bool,
    pub error: Option<WeatherError>,
    /// Persisted map style.
    pub is_dark_mode: bool,
    /// Coordinate of the last tap, if any.
    pub marker: Option<LatLng>,
    /// Reverse-geocoded address of the marker.
    pub address: String,
}

impl ScreenState for SearchByMapViewState {
    fn error(&self) -> Option<&WeatherError> {
        self.error.as_ref()
    }

    fn set_error(&mut self, error: Option<WeatherError>) {
        self.error = error;
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn clear_busy(&mut self) {
        self.is_loading = false;
    }
}
