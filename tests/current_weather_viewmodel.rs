mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{
    sample_snapshot, test_config, wait_until, FailingCurrentWeather, FailingHourlyWeather,
    GatedCurrentWeather, StaticCurrentWeather, StaticGeocoder, StaticHourlyWeather,
    StaticLocation, HANOI, SAIGON,
};
use skycast::error::{AlertAction, WeatherError};
use skycast::presentation::current_weather::{CurrentWeatherEvent, CurrentWeatherViewModel};

fn build_vm(
    current: impl skycast::domain::usecase::CurrentWeatherSource + 'static,
    hourly: impl skycast::domain::usecase::HourlyWeatherSource + 'static,
) -> CurrentWeatherViewModel {
    CurrentWeatherViewModel::new(
        &test_config(),
        Arc::new(current),
        Arc::new(hourly),
        Arc::new(StaticLocation { lat_lng: SAIGON }),
        Arc::new(StaticGeocoder::new(SAIGON)),
    )
}

#[tokio::test]
async fn successful_fetch_populates_payload_and_clears_flags() {
    let vm = build_vm(StaticCurrentWeather::new(), StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.get_weather_by_location(HANOI);

    let state = wait_until(&mut watcher, |s| s.current_weather.is_some()).await;
    assert!(!state.is_loading);
    assert!(!state.is_refresh);
    assert!(state.error.is_none());
    assert_eq!(state.current_weather, Some(sample_snapshot()));
    assert_eq!(state.hourly_today.len(), 1);
}

#[tokio::test]
async fn check_permission_event_is_emitted_at_construction() {
    let vm = build_vm(StaticCurrentWeather::new(), StaticHourlyWeather::new());
    let mut events = vm.take_events().expect("first take yields the receiver");
    assert!(vm.take_events().is_none());

    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("event should arrive");
    assert_eq!(event, Some(CurrentWeatherEvent::CheckPermission));
}

#[tokio::test]
async fn same_coordinate_is_a_noop_fast_path() {
    let current = StaticCurrentWeather::new();
    let calls = Arc::clone(&current.calls);
    let vm = build_vm(current, StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.get_weather_by_location(HANOI);
    wait_until(&mut watcher, |s| s.current_weather.is_some()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    vm.get_weather_by_location(HANOI);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A different coordinate does fetch.
    vm.get_weather_by_location(SAIGON);
    assert!(vm.state().is_loading);
    wait_until(&mut watcher, |s| !s.is_loading).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn refresh_always_refetches_the_held_location() {
    let current = StaticCurrentWeather::new();
    let calls = Arc::clone(&current.calls);
    let vm = build_vm(current, StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.get_weather_by_location(HANOI);
    wait_until(&mut watcher, |s| s.current_weather.is_some()).await;

    vm.on_refresh(true);
    wait_until(&mut watcher, |s| !s.is_loading && !s.is_refresh).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn refresh_shows_the_refresh_indicator_not_the_spinner() {
    let gated = GatedCurrentWeather::new();
    let gate = Arc::clone(&gated.gate);
    let vm = build_vm(gated, StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.on_refresh(true);
    let state = wait_until(&mut watcher, |s| s.is_refresh).await;
    assert!(!state.is_loading);

    gate.notify_one();
    let state = wait_until(&mut watcher, |s| s.current_weather.is_some()).await;
    assert!(!state.is_refresh);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn refresh_without_indicator_uses_the_spinner() {
    let gated = GatedCurrentWeather::new();
    let gate = Arc::clone(&gated.gate);
    let vm = build_vm(gated, StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.on_refresh(false);
    let state = wait_until(&mut watcher, |s| s.is_loading).await;
    assert!(!state.is_refresh);

    gate.notify_one();
    wait_until(&mut watcher, |s| s.current_weather.is_some()).await;
}

#[tokio::test]
async fn failed_fetch_sets_the_error_and_clears_flags() {
    let error = WeatherError::other("current fetch failed");
    let vm = build_vm(
        FailingCurrentWeather {
            error: error.clone(),
        },
        StaticHourlyWeather::new(),
    );
    let mut watcher = vm.watch();

    vm.get_weather_by_location(HANOI);

    let state = wait_until(&mut watcher, |s| s.error.is_some()).await;
    assert_eq!(state.error, Some(error));
    assert!(!state.is_loading);
    assert!(state.current_weather.is_none());
}

#[tokio::test]
async fn first_error_wins_until_dismissed() {
    let first = WeatherError::other("first");
    let vm = build_vm(
        FailingCurrentWeather {
            error: first.clone(),
        },
        StaticHourlyWeather::new(),
    );
    let mut watcher = vm.watch();

    vm.get_weather_by_location(HANOI);
    wait_until(&mut watcher, |s| s.error.is_some()).await;

    // A second error while the first is displayed is suppressed.
    vm.permission_not_granted();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(vm.state().error, Some(first));

    // After dismissal the next error is shown again.
    vm.hide_error();
    let state = wait_until(&mut watcher, |s| s.error.is_none()).await;
    assert!(!state.is_loading);

    vm.permission_not_granted();
    let state = wait_until(&mut watcher, |s| s.error.is_some()).await;
    assert!(state.error.as_ref().is_some_and(WeatherError::is_alert));
}

#[tokio::test]
async fn permission_denial_is_an_alert_pointing_at_settings() {
    let vm = build_vm(StaticCurrentWeather::new(), StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.permission_not_granted();

    let state = wait_until(&mut watcher, |s| s.error.is_some()).await;
    match state.error {
        Some(WeatherError::Alert { dialog, .. }) => {
            assert_eq!(dialog.positive_action, AlertAction::OpenPermissionSettings);
        }
        other => panic!("expected alert error, got {other:?}"),
    }
}

#[tokio::test]
async fn hourly_failure_leaves_no_partial_payload() {
    let vm = build_vm(
        StaticCurrentWeather::new(),
        FailingHourlyWeather {
            error: WeatherError::other("hourly fetch failed"),
        },
    );
    let mut watcher = vm.watch();

    vm.get_weather_by_location(HANOI);

    let state = wait_until(&mut watcher, |s| s.error.is_some()).await;
    assert!(state.current_weather.is_none());
    assert!(state.hourly_today.is_empty());
}

#[tokio::test]
async fn current_location_intent_resolves_then_fetches() {
    let current = StaticCurrentWeather::new();
    let calls = Arc::clone(&current.calls);
    let vm = build_vm(current, StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    // StaticLocation reports SAIGON.
    vm.get_current_location();

    wait_until(&mut watcher, |s| s.current_weather.is_some()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // The resolved coordinate is now held: tapping it again is a no-op.
    vm.get_weather_by_location(SAIGON);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn address_intent_geocodes_then_fetches() {
    let current = StaticCurrentWeather::new();
    let calls = Arc::clone(&current.calls);
    let vm = build_vm(current, StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.get_weather_by_address("Ho Chi Minh City");

    wait_until(&mut watcher, |s| s.current_weather.is_some()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn navigate_event_carries_the_held_location() {
    let vm = build_vm(StaticCurrentWeather::new(), StaticHourlyWeather::new());
    let mut events = vm.take_events().expect("receiver");
    let mut watcher = vm.watch();

    assert_eq!(
        events.recv().await,
        Some(CurrentWeatherEvent::CheckPermission)
    );

    vm.get_weather_by_location(HANOI);
    wait_until(&mut watcher, |s| s.current_weather.is_some()).await;

    vm.navigate_to_search_by_map();
    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("event should arrive");
    assert_eq!(
        event,
        Some(CurrentWeatherEvent::NavigateToSearchByMap { lat_lng: HANOI })
    );
}

#[tokio::test]
async fn dropping_the_view_model_cancels_the_fetch() {
    let gated = GatedCurrentWeather::new();
    let vm = build_vm(gated, StaticHourlyWeather::new());
    let mut watcher = vm.watch();

    vm.get_weather_by_location(HANOI);
    wait_until(&mut watcher, |s| s.is_loading).await;

    // The gate never opens; only cancellation can release the fetch task.
    drop(vm);

    loop {
        match tokio::time::timeout(Duration::from_secs(2), watcher.next())
            .await
            .expect("container should close after cancellation")
        {
            Some(state) => assert!(state.current_weather.is_none()),
            None => break,
        }
    }
}
