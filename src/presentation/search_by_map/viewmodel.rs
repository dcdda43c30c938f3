use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::Config;
use crate::domain::model::LatLng;
use crate::domain::usecase::{LocationSource, MapStylePreferences, ReverseGeocoder};
use crate::flow::{events, EventReceiver, OverflowPolicy, StateContainer, StateWatcher};
use crate::presentation::viewmodel::{first_value, FetchGuard, ScreenState, ViewModelCore};

use super::event::SearchByMapEvent;
use super::state::SearchByMapViewState;

/// View-model for the search-by-map screen: tap a coordinate, see its
/// address, hand the selection back.
///
/// The persisted map style is collected as a stream for the whole lifetime
/// of the screen, so edits made elsewhere show up here too.
pub struct SearchByMapViewModel {
    shared: Arc<Shared>,
    events: Mutex<Option<EventReceiver<SearchByMapEvent>>>,
}

struct Shared {
    core: ViewModelCore<SearchByMapViewState, SearchByMapEvent>,
    reverse_geocoder: Arc<dyn ReverseGeocoder>,
    location: Arc<dyn LocationSource>,
    preferences: Arc<dyn MapStylePreferences>,
    guard: FetchGuard,
}

impl SearchByMapViewModel {
    /// Must be called within a Tokio runtime: construction starts the
    /// map-style collector on the view-model's scope.
    pub fn new(
        config: &Config,
        reverse_geocoder: Arc<dyn ReverseGeocoder>,
        location: Arc<dyn LocationSource>,
        preferences: Arc<dyn MapStylePreferences>,
    ) -> Self {
        // A newer tap supersedes older ones, so the oldest queued event is
        // droppable here.
        let (tx, rx) = events::channel(config.events.capacity, OverflowPolicy::DropOldest);
        let core = ViewModelCore::new(StateContainer::new(SearchByMapViewState::default()), tx);
        let shared = Arc::new(Shared {
            core,
            reverse_geocoder,
            location,
            preferences,
            guard: FetchGuard::new(),
        });

        let collector = Arc::clone(&shared);
        shared.core.scope().spawn(async move {
            let mut styles = collector.preferences.dark_mode();
            while let Some(item) = styles.next().await {
                match item {
                    Ok(enabled) => collector.core.state().update(|s| s.is_dark_mode = enabled),
                    Err(err) => collector.core.show_error(err),
                }
            }
        });

        Self {
            shared,
            events: Mutex::new(Some(rx)),
        }
    }

    /// Latest snapshot.
    pub fn state(&self) -> SearchByMapViewState {
        self.shared.core.read()
    }

    /// Subscribe; the current snapshot is replayed immediately.
    pub fn watch(&self) -> StateWatcher<SearchByMapViewState> {
        self.shared.core.watch()
    }

    /// Single-consumer event stream. The first caller takes it.
    pub fn take_events(&self) -> Option<EventReceiver<SearchByMapEvent>> {
        self.events.lock().take()
    }

    /// The user tapped the map. Tapping the held coordinate again is a
    /// no-op.
    pub fn on_map_tap(&self, lat_lng: LatLng) {
        if !self.shared.guard.mark_if_changed(lat_lng) {
            return;
        }
        self.shared.core.state().update(|s| {
            s.error = None;
            s.is_loading = true;
            s.marker = Some(lat_lng);
        });
        let token = self.shared.guard.restart(self.shared.core.scope());
        let shared = Arc::clone(&self.shared);
        self.shared
            .core
            .scope()
            .spawn_guarded(token, async move { shared.resolve_address(lat_lng).await });
    }

    /// Resolve the device position and treat it as a tap.
    pub fn get_current_location(&self) {
        let shared = Arc::clone(&self.shared);
        shared.core.begin_loading();
        let token = shared.guard.restart(shared.core.scope());
        let task = {
            let shared = Arc::clone(&shared);
            async move {
                match first_value(shared.location.current_location()).await {
                    Ok(lat_lng) => {
                        if shared.guard.mark_if_changed(lat_lng) {
                            shared.core.state().update(|s| s.marker = Some(lat_lng));
                            shared.resolve_address(lat_lng).await;
                        } else {
                            shared.core.hide_loading();
                        }
                    }
                    Err(err) => shared.core.show_error(err),
                }
            }
        };
        shared.core.scope().spawn_guarded(token, task);
    }

    /// Flip the persisted map style. The new value flows back into state
    /// through the preference stream.
    pub fn toggle_dark_mode(&self) {
        let shared = Arc::clone(&self.shared);
        self.shared.core.scope().spawn(async move {
            let enabled = !shared.core.read().is_dark_mode;
            if let Err(err) = shared.preferences.set_dark_mode(enabled).await {
                shared.core.show_error(err);
            }
        });
    }

    /// Hand the marked place back to the previous screen.
    pub fn confirm_selection(&self) {
        let state = self.shared.core.read();
        match state.marker {
            Some(lat_lng) => self.shared.core.emit(SearchByMapEvent::NavigateBack {
                lat_lng,
                address: state.address,
            }),
            None => debug!("no marker to confirm"),
        }
    }

    pub fn hide_error(&self) {
        self.shared.core.hide_error();
    }
}

impl Shared {
    async fn resolve_address(&self, lat_lng: LatLng) {
        debug!(%lat_lng, "reverse geocoding marker");
        match first_value(self.reverse_geocoder.address_from_location(lat_lng)).await {
            Ok(address) => {
                self.core.state().update(|s| {
                    s.clear_busy();
                    s.address = address.display_name;
                });
            }
            Err(err) => self.core.show_error(err),
        }
    }
}
