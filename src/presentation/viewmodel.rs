//! Shared view-model protocol.

use futures::StreamExt;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::model::LatLng;
use crate::domain::usecase::DataStream;
use crate::error::WeatherError;
use crate::flow::{EventSender, StateContainer, StateWatcher, TaskScope};

/// Renderable screen snapshot.
///
/// Implementations are immutable value types: the container replaces them
/// wholesale on every update, and the accessors below let the shared fetch
/// protocol drive the busy/error fields without knowing the payload.
pub trait ScreenState: Clone + Default + PartialEq + Send + Sync + 'static {
    fn error(&self) -> Option<&WeatherError>;
    fn set_error(&mut self, error: Option<WeatherError>);
    fn set_loading(&mut self, loading: bool);
    /// Mark a pull-to-refresh in progress. Screens without the gesture keep
    /// the default no-op.
    fn set_refreshing(&mut self, _refreshing: bool) {}
    /// Clear every busy flag (loading and refresh).
    fn clear_busy(&mut self);
}

/// State container, event sender and task scope bundled with the fetch
/// protocol every screen shares.
pub struct ViewModelCore<S: ScreenState, E> {
    state: StateContainer<S>,
    events: EventSender<E>,
    scope: TaskScope,
}

impl<S: ScreenState, E: Send + 'static> ViewModelCore<S, E> {
    pub fn new(state: StateContainer<S>, events: EventSender<E>) -> Self {
        Self {
            state,
            events,
            scope: TaskScope::new(),
        }
    }

    pub fn state(&self) -> &StateContainer<S> {
        &self.state
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }

    pub fn read(&self) -> S {
        self.state.read()
    }

    pub fn watch(&self) -> StateWatcher<S> {
        self.state.watch()
    }

    /// Start a fresh fetch: clear any displayed error, show the spinner.
    pub fn begin_loading(&self) {
        self.state.update(|s| {
            s.set_error(None);
            s.set_loading(true);
        });
    }

    /// Start a pull-to-refresh. `show_refresh` picks which indicator is
    /// visible while the fetch runs; the two are mutually exclusive.
    pub fn begin_refresh(&self, show_refresh: bool) {
        self.state.update(|s| {
            s.set_error(None);
            s.set_refreshing(show_refresh);
            s.set_loading(!show_refresh);
        });
    }

    pub fn hide_loading(&self) {
        self.state.update(|s| s.clear_busy());
    }

    /// First error wins: while an error is displayed, later ones are
    /// dropped rather than replacing it. Deliberate de-duplication — the
    /// user dismisses one dialog, not a cascade.
    pub fn show_error(&self, error: WeatherError) {
        self.state.update(|s| {
            if s.error().is_none() {
                s.set_error(Some(error));
                s.clear_busy();
            } else {
                debug!(suppressed = %error, "error already displayed, dropping");
            }
        });
    }

    pub fn hide_error(&self) {
        self.state.update(|s| {
            s.set_error(None);
            s.clear_busy();
        });
    }

    /// Fire-and-forget one-shot emission. The synchronous fast path keeps
    /// emission order; only a full queue falls back to a scoped task.
    pub fn emit(&self, event: E) {
        if let Err(event) = self.events.try_send(event) {
            let events = self.events.clone();
            self.scope.spawn(async move {
                events.send(event).await;
            });
        }
    }
}

/// Held-coordinate and in-flight-fetch bookkeeping for screens that fetch
/// per coordinate.
pub(crate) struct FetchGuard {
    held: Mutex<Option<LatLng>>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl FetchGuard {
    pub(crate) fn new() -> Self {
        Self {
            held: Mutex::new(None),
            in_flight: Mutex::new(None),
        }
    }

    /// Record `lat_lng` as held unless it already is (exact match). A
    /// `false` return is the no-op fast path: same coordinate, no fetch.
    pub(crate) fn mark_if_changed(&self, lat_lng: LatLng) -> bool {
        let mut held = self.held.lock();
        if *held == Some(lat_lng) {
            debug!(%lat_lng, "coordinate unchanged, skipping fetch");
            return false;
        }
        *held = Some(lat_lng);
        true
    }

    pub(crate) fn hold(&self, lat_lng: LatLng) {
        *self.held.lock() = Some(lat_lng);
    }

    pub(crate) fn held_or(&self, fallback: LatLng) -> LatLng {
        (*self.held.lock()).unwrap_or(fallback)
    }

    /// Cancel the previous fetch and mint the next one's token.
    pub(crate) fn restart(&self, scope: &TaskScope) -> CancellationToken {
        let token = scope.child_token();
        if let Some(prev) = self.in_flight.lock().replace(token.clone()) {
            prev.cancel();
        }
        token
    }
}

/// First value of a use-case stream, or the error it ends with.
pub(crate) async fn first_value<T>(mut stream: DataStream<T>) -> Result<T, WeatherError> {
    match stream.next().await {
        Some(result) => result,
        None => Err(WeatherError::other("use-case stream ended without a value")),
    }
}
