use crate::domain::model::LatLng;

/// One-shot instructions to the seven-day view. Never replayed.
#[derive(Debug, Clone, PartialEq)]
pub enum SevenDaysEvent {
    /// Open the text-search screen seeded with the held location.
    NavigateToSearchByText { lat_lng: LatLng },
}
