//! Shared mock use-cases for view-model tests.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use tokio::sync::{watch, Notify};

use skycast::config::Config;
use skycast::domain::model::{
    Address, CurrentWeatherSnapshot, DailyCollection, DailyEntry, HourlyCollection, HourlyEntry,
    LatLng,
};
use skycast::domain::usecase::{
    CurrentWeatherSource, DailyWeatherSource, DataStream, Geocoder, HourlyWeatherSource,
    LocationSource, MapStylePreferences, ReverseGeocoder,
};
use skycast::error::WeatherError;
use skycast::flow::StateWatcher;

pub const HANOI: LatLng = LatLng::new(21.0278, 105.8342);
pub const SAIGON: LatLng = LatLng::new(10.8231, 106.6297);

pub fn test_config() -> Config {
    Config::default()
}

pub fn sample_snapshot() -> CurrentWeatherSnapshot {
    CurrentWeatherSnapshot {
        temperature_c: 31.4,
        feels_like_c: 36.2,
        weather_code: 2,
        condition: "Partly cloudy".to_string(),
        humidity_pct: 74,
        wind_speed_kmh: 9.7,
        observed_at: None,
    }
}

pub fn sample_hourly() -> HourlyCollection {
    HourlyCollection {
        today: vec![HourlyEntry {
            time: chrono::NaiveDate::from_ymd_opt(2026, 8, 7)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            temperature_c: 31.4,
            weather_code: 2,
            condition: "Partly cloudy".to_string(),
        }],
    }
}

pub fn sample_daily() -> DailyCollection {
    DailyCollection {
        days: (1..=7)
            .map(|d| DailyEntry {
                date: chrono::NaiveDate::from_ymd_opt(2026, 8, d).unwrap(),
                temp_min_c: 22.0,
                temp_max_c: 30.0,
                weather_code: 1,
                condition: "Mainly clear".to_string(),
                wind_speed_kmh: 12.0,
                uv_index: Some(8.5),
                sunrise: None,
                sunset: None,
            })
            .collect(),
    }
}

/// Waits (bounded) for a state matching `pred`.
pub async fn wait_until<S: Clone>(
    watcher: &mut StateWatcher<S>,
    pred: impl FnMut(&S) -> bool,
) -> S {
    tokio::time::timeout(Duration::from_secs(2), watcher.wait_for(pred))
        .await
        .expect("timed out waiting for state")
        .expect("state container dropped")
}

/// Counts calls and returns a fixed snapshot.
pub struct StaticCurrentWeather {
    pub snapshot: CurrentWeatherSnapshot,
    pub calls: Arc<AtomicUsize>,
}

impl StaticCurrentWeather {
    pub fn new() -> Self {
        Self {
            snapshot: sample_snapshot(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl CurrentWeatherSource for StaticCurrentWeather {
    fn current_weather(&self, _location: LatLng) -> DataStream<CurrentWeatherSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.snapshot.clone();
        stream::once(async move { Ok(snapshot) }).boxed()
    }
}

/// Emits only once `gate` is notified; used to observe in-flight states.
pub struct GatedCurrentWeather {
    pub snapshot: CurrentWeatherSnapshot,
    pub gate: Arc<Notify>,
}

impl GatedCurrentWeather {
    pub fn new() -> Self {
        Self {
            snapshot: sample_snapshot(),
            gate: Arc::new(Notify::new()),
        }
    }
}

impl CurrentWeatherSource for GatedCurrentWeather {
    fn current_weather(&self, _location: LatLng) -> DataStream<CurrentWeatherSnapshot> {
        let snapshot = self.snapshot.clone();
        let gate = Arc::clone(&self.gate);
        stream::once(async move {
            gate.notified().await;
            Ok(snapshot)
        })
        .boxed()
    }
}

pub struct FailingCurrentWeather {
    pub error: WeatherError,
}

impl CurrentWeatherSource for FailingCurrentWeather {
    fn current_weather(&self, _location: LatLng) -> DataStream<CurrentWeatherSnapshot> {
        let error = self.error.clone();
        stream::once(async move { Err(error) }).boxed()
    }
}

pub struct StaticHourlyWeather {
    pub collection: HourlyCollection,
}

impl StaticHourlyWeather {
    pub fn new() -> Self {
        Self {
            collection: sample_hourly(),
        }
    }
}

impl HourlyWeatherSource for StaticHourlyWeather {
    fn hourly_weather(&self, _location: LatLng) -> DataStream<HourlyCollection> {
        let collection = self.collection.clone();
        stream::once(async move { Ok(collection) }).boxed()
    }
}

pub struct FailingHourlyWeather {
    pub error: WeatherError,
}

impl HourlyWeatherSource for FailingHourlyWeather {
    fn hourly_weather(&self, _location: LatLng) -> DataStream<HourlyCollection> {
        let error = self.error.clone();
        stream::once(async move { Err(error) }).boxed()
    }
}

pub struct StaticDailyWeather {
    pub collection: DailyCollection,
    pub calls: Arc<AtomicUsize>,
}

impl StaticDailyWeather {
    pub fn new() -> Self {
        Self {
            collection: sample_daily(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl DailyWeatherSource for StaticDailyWeather {
    fn daily_weather(&self, _location: LatLng) -> DataStream<DailyCollection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let collection = self.collection.clone();
        stream::once(async move { Ok(collection) }).boxed()
    }
}

pub struct StaticLocation {
    pub lat_lng: LatLng,
}

impl LocationSource for StaticLocation {
    fn current_location(&self) -> DataStream<LatLng> {
        let lat_lng = self.lat_lng;
        stream::once(async move { Ok(lat_lng) }).boxed()
    }
}

pub struct StaticGeocoder {
    pub lat_lng: LatLng,
    pub calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    pub fn new(lat_lng: LatLng) -> Self {
        Self {
            lat_lng,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Geocoder for StaticGeocoder {
    fn location_from_text(&self, _address: &str) -> DataStream<LatLng> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lat_lng = self.lat_lng;
        stream::once(async move { Ok(lat_lng) }).boxed()
    }
}

pub struct StaticReverseGeocoder {
    pub display_name: String,
    pub calls: Arc<AtomicUsize>,
}

impl StaticReverseGeocoder {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ReverseGeocoder for StaticReverseGeocoder {
    fn address_from_location(&self, _location: LatLng) -> DataStream<Address> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let display_name = self.display_name.clone();
        stream::once(async move { Ok(Address { display_name }) }).boxed()
    }
}

/// In-memory preference store with change streaming.
pub struct MemoryPrefs {
    tx: watch::Sender<bool>,
}

impl MemoryPrefs {
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }
}

#[async_trait]
impl MapStylePreferences for MemoryPrefs {
    fn dark_mode(&self) -> DataStream<bool> {
        let rx = self.tx.subscribe();
        stream::unfold((rx, false), |(mut rx, replayed)| async move {
            if !replayed {
                let value = *rx.borrow_and_update();
                return Some((Ok::<_, WeatherError>(value), (rx, true)));
            }
            match rx.changed().await {
                Ok(()) => {
                    let value = *rx.borrow_and_update();
                    Some((Ok(value), (rx, true)))
                }
                Err(_) => None,
            }
        })
        .boxed()
    }

    async fn set_dark_mode(&self, enabled: bool) -> Result<(), WeatherError> {
        self.tx.send_modify(|value| *value = enabled);
        Ok(())
    }
}
