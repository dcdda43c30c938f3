use crate::domain::model::LatLng;

/// One-shot instructions to the current-weather view. Never replayed.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentWeatherEvent {
    /// Ask the view to check (and, if needed, request) location permission.
    CheckPermission,
    /// Open the search-by-map screen centred on the held location.
    NavigateToSearchByMap { lat_lng: LatLng },
}
