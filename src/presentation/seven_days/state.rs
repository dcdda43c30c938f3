use crate::domain::model::DailyEntry;
use crate::error::WeatherError;
use crate::presentation::viewmodel::ScreenState;

/// Snapshot of the seven-day screen: the forecast plus the address it was
/// resolved for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SevenDaysViewState {
    pub is_loading: bool,
    pub is_refresh: bool,
    pub error: Option<WeatherError>,
    pub address: String,
    pub seven_days: Vec<DailyEntry>,
}

impl ScreenState for SevenDaysViewState {
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
