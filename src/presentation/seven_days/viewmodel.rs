use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::Config;
use crate::domain::model::LatLng;
use crate::domain::usecase::{DailyWeatherSource, Geocoder, ReverseGeocoder};
use crate::flow::{events, EventReceiver, OverflowPolicy, StateContainer, StateWatcher, Zip};
use crate::presentation::viewmodel::{first_value, FetchGuard, ScreenState, ViewModelCore};

use super::event::SevenDaysEvent;
use super::state::SevenDaysViewState;

/// View-model for the seven-day forecast screen.
///
/// The daily forecast and the reverse-geocoded address are fetched as a
/// pair, so the screen never shows a forecast labelled with a stale place.
pub struct SevenDaysViewModel {
    shared: Arc<Shared>,
    events: Mutex<Option<EventReceiver<SevenDaysEvent>>>,
}

struct Shared {
    core: ViewModelCore<SevenDaysViewState, SevenDaysEvent>,
    daily_weather: Arc<dyn DailyWeatherSource>,
    geocoder: Arc<dyn Geocoder>,
    reverse_geocoder: Arc<dyn ReverseGeocoder>,
    default_location: LatLng,
    guard: FetchGuard,
}

impl SevenDaysViewModel {
    /// Must be called within a Tokio runtime.
    pub fn new(
        config: &Config,
        daily_weather: Arc<dyn DailyWeatherSource>,
        geocoder: Arc<dyn Geocoder>,
        reverse_geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        // Same policy as the current-weather screen: navigation events
        // block the producer rather than getting lost.
        let (tx, rx) = events::channel(config.events.capacity, OverflowPolicy::Block);
        let core = ViewModelCore::new(StateContainer::new(SevenDaysViewState::default()), tx);
        Self {
            shared: Arc::new(Shared {
                core,
                daily_weather,
                geocoder,
                reverse_geocoder,
                default_location: config.location.lat_lng(),
                guard: FetchGuard::new(),
            }),
            events: Mutex::new(Some(rx)),
        }
    }

    /// Latest snapshot.
    pub fn state(&self) -> SevenDaysViewState {
        self.shared.core.read()
    }

    /// Subscribe; the current snapshot is replayed immediately.
    pub fn watch(&self) -> StateWatcher<SevenDaysViewState> {
        self.shared.core.watch()
    }

    /// Single-consumer event stream. The first caller takes it.
    pub fn take_events(&self) -> Option<EventReceiver<SevenDaysEvent>> {
        self.events.lock().take()
    }

    /// Geocode `address` and fetch the forecast for the result.
    pub fn get_weather_by_address(&self, address: &str) {
        let address = address.to_owned();
        let shared = Arc::clone(&self.shared);
        shared.core.begin_loading();
        let token = shared.guard.restart(shared.core.scope());
        let task = {
            let shared = Arc::clone(&shared);
            async move {
                match first_value(shared.geocoder.location_from_text(&address)).await {
                    Ok(lat_lng) => shared.fetch_if_changed(lat_lng).await,
                    Err(err) => shared.core.show_error(err),
                }
            }
        };
        shared.core.scope().spawn_guarded(token, task);
    }

    /// Fetch the forecast for an explicitly chosen coordinate.
    pub fn get_weather_by_location(&self, lat_lng: LatLng) {
        if !self.shared.guard.mark_if_changed(lat_lng) {
            return;
        }
        self.shared.core.begin_loading();
        self.shared.spawn_fetch(lat_lng);
    }

    /// Re-fetch the held (or default) location.
    pub fn on_refresh(&self, show_refresh: bool) {
        let lat_lng = self.shared.guard.held_or(self.shared.default_location);
        self.shared.guard.hold(lat_lng);
        self.shared.core.begin_refresh(show_refresh);
        self.shared.spawn_fetch(lat_lng);
    }

    pub fn navigate_to_search(&self) {
        let lat_lng = self.shared.guard.held_or(self.shared.default_location);
        self.shared
            .core
            .emit(SevenDaysEvent::NavigateToSearchByText { lat_lng });
    }

    pub fn hide_error(&self) {
        self.shared.core.hide_error();
    }

    pub fn hide_loading(&self) {
        self.shared.core.hide_loading();
    }
}

impl Shared {
    fn spawn_fetch(self: &Arc<Self>, lat_lng: LatLng) {
        let token = self.guard.restart(self.core.scope());
        let shared = Arc::clone(self);
        self.core
            .scope()
            .spawn_guarded(token, async move { shared.fetch_forecast(lat_lng).await });
    }

    async fn fetch_if_changed(&self, lat_lng: LatLng) {
        if self.guard.mark_if_changed(lat_lng) {
            self.fetch_forecast(lat_lng).await;
        } else {
            self.core.hide_loading();
        }
    }

    async fn fetch_forecast(&self, lat_lng: LatLng) {
        debug!(%lat_lng, "fetching seven-day forecast");
        let mut combined = Zip::new(
            self.daily_weather.daily_weather(lat_lng),
            self.reverse_geocoder.address_from_location(lat_lng),
        );
        while let Some(item) = combined.next().await {
            match item {
                Ok((daily, address)) => {
                    self.core.state().update(|s| {
                        s.clear_busy();
                        s.seven_days = daily.days;
                        s.address = address.display_name;
                    });
                }
                Err(err) => {
                    self.core.show_error(err);
                    return;
                }
            }
        }
    }
}
