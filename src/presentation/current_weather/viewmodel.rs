use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::Config;
use crate::domain::model::LatLng;
use crate::domain::usecase::{CurrentWeatherSource, Geocoder, HourlyWeatherSource, LocationSource};
use crate::error::WeatherError;
use crate::flow::{events, EventReceiver, OverflowPolicy, StateContainer, StateWatcher, Zip};
use crate::presentation::viewmodel::{first_value, FetchGuard, ScreenState, ViewModelCore};

use super::event::CurrentWeatherEvent;
use super::state::CurrentWeatherViewState;

/// View-model for the current-weather screen.
///
/// Each fetch intent cancels the previous in-flight fetch, and a location
/// change to the coordinate already held is a no-op. The current and hourly
/// forecasts are fetched as a pair: the screen shows both or neither.
pub struct CurrentWeatherViewModel {
    shared: Arc<Shared>,
    events: Mutex<Option<EventReceiver<CurrentWeatherEvent>>>,
}

struct Shared {
    core: ViewModelCore<CurrentWeatherViewState, CurrentWeatherEvent>,
    current_weather: Arc<dyn CurrentWeatherSource>,
    hourly_weather: Arc<dyn HourlyWeatherSource>,
    location: Arc<dyn LocationSource>,
    geocoder: Arc<dyn Geocoder>,
    default_location: LatLng,
    guard: FetchGuard,
}

impl CurrentWeatherViewModel {
    /// Must be called within a Tokio runtime: construction emits the
    /// initial `CheckPermission` event on the view-model's scope.
    pub fn new(
        config: &Config,
        current_weather: Arc<dyn CurrentWeatherSource>,
        hourly_weather: Arc<dyn HourlyWeatherSource>,
        location: Arc<dyn LocationSource>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        // Navigation and permission prompts must not be lost: block the
        // producer when the queue is full.
        let (tx, rx) = events::channel(config.events.capacity, OverflowPolicy::Block);
        let core = ViewModelCore::new(StateContainer::new(CurrentWeatherViewState::default()), tx);
        let shared = Arc::new(Shared {
            core,
            current_weather,
            hourly_weather,
            location,
            geocoder,
            default_location: config.location.lat_lng(),
            guard: FetchGuard::new(),
        });

        // The view decides whether permission is already granted.
        shared.core.emit(CurrentWeatherEvent::CheckPermission);

        Self {
            shared,
            events: Mutex::new(Some(rx)),
        }
    }

    /// Latest snapshot.
    pub fn state(&self) -> CurrentWeatherViewState {
        self.shared.core.read()
    }

    /// Subscribe; the current snapshot is replayed immediately.
    pub fn watch(&self) -> StateWatcher<CurrentWeatherViewState> {
        self.shared.core.watch()
    }

    /// Single-consumer event stream. The first caller takes it; later
    /// calls return `None`.
    pub fn take_events(&self) -> Option<EventReceiver<CurrentWeatherEvent>> {
        self.events.lock().take()
    }

    /// Geocode `address` and fetch weather for the result.
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

    /// Fetch weather for an explicitly chosen coordinate (e.g. a map tap).
    pub fn get_weather_by_location(&self, lat_lng: LatLng) {
        if !self.shared.guard.mark_if_changed(lat_lng) {
            return;
        }
        self.shared.core.begin_loading();
        self.shared.spawn_fetch(lat_lng);
    }

    /// Resolve the device position and fetch weather for it.
    pub fn get_current_location(&self) {
        let shared = Arc::clone(&self.shared);
        shared.core.begin_loading();
        let token = shared.guard.restart(shared.core.scope());
        let task = {
            let shared = Arc::clone(&shared);
            async move {
                match first_value(shared.location.current_location()).await {
                    Ok(lat_lng) => shared.fetch_if_changed(lat_lng).await,
                    Err(err) => shared.core.show_error(err),
                }
            }
        };
        shared.core.scope().spawn_guarded(token, task);
    }

    /// Re-fetch the held (or default) location. `show_refresh` selects the
    /// pull-to-refresh indicator over the plain spinner.
    pub fn on_refresh(&self, show_refresh: bool) {
        let lat_lng = self.shared.guard.held_or(self.shared.default_location);
        self.shared.guard.hold(lat_lng);
        self.shared.core.begin_refresh(show_refresh);
        self.shared.spawn_fetch(lat_lng);
    }

    /// The view reported that location permission was denied.
    pub fn permission_not_granted(&self) {
        self.shared
            .core
            .show_error(WeatherError::permission_not_granted());
    }

    pub fn navigate_to_search_by_map(&self) {
        let lat_lng = self.shared.guard.held_or(self.shared.default_location);
        self.shared
            .core
            .emit(CurrentWeatherEvent::NavigateToSearchByMap { lat_lng });
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
            .spawn_guarded(token, async move { shared.fetch_weather(lat_lng).await });
    }

    /// Fetch unless `lat_lng` is already held; the caller has shown the
    /// spinner, so the no-op path hides it again.
    async fn fetch_if_changed(&self, lat_lng: LatLng) {
        if self.guard.mark_if_changed(lat_lng) {
            self.fetch_weather(lat_lng).await;
        } else {
            self.core.hide_loading();
        }
    }

    async fn fetch_weather(&self, lat_lng: LatLng) {
        debug!(%lat_lng, "fetching current and hourly weather");
        let mut combined = Zip::new(
            self.current_weather.current_weather(lat_lng),
            self.hourly_weather.hourly_weather(lat_lng),
        );
        while let Some(item) = combined.next().await {
            match item {
                Ok((current, hourly)) => {
                    self.core.state().update(|s| {
                        s.clear_busy();
                        s.current_weather = Some(current);
                        s.hourly_today = hourly.today;
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
