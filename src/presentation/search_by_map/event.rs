use crate::domain::model::LatLng;

/// One-shot instructions to the search-by-map view. Never replayed.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchByMapEvent {
    /// Return the chosen place to the previous screen.
    NavigateBack { lat_lng: LatLng, address: String },
}
