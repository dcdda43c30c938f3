//! Location source backed by configuration.

use futures::stream;
use futures::StreamExt;

use crate::domain::model::LatLng;
use crate::domain::usecase::{DataStream, LocationSource};

/// Stands in for a platform positioning service: emits the configured
/// coordinate once. Real deployments on hardware with a positioning stack
/// provide their own [`LocationSource`].
pub struct FixedLocationSource {
    location: LatLng,
}

impl FixedLocationSource {
    pub fn new(location: LatLng) -> Self {
        Self { location }
    }
}

impl LocationSource for FixedLocationSource {
    fn current_location(&self) -> DataStream<LatLng> {
        let location = self.location;
        stream::once(async move { Ok(location) }).boxed()
    }
}
