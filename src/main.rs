//! Headless CLI driver for the weather view-models.
//!
//! The binary is the reference consumer of the view contract: it builds the
//! data layer, fires one intent, watches the state container until the
//! fetch settles, and renders the snapshot (or the error dialog) as text.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use skycast::config::Config;
use skycast::data::geocoding::{NominatimGeocoder, OpenMeteoGeocoder};
use skycast::data::location::FixedLocationSource;
use skycast::data::open_meteo::OpenMeteoClient;
use skycast::domain::model::LatLng;
use skycast::error::WeatherError;
use skycast::presentation::current_weather::{CurrentWeatherEvent, CurrentWeatherViewModel};
use skycast::presentation::seven_days::SevenDaysViewModel;

#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Look up current, hourly and seven-day weather")]
struct Args {
    /// Address to look up (geocoded). Without an address or coordinate the
    /// configured default location is used.
    #[arg(long, short)]
    address: Option<String>,

    /// Latitude of an explicit coordinate.
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Longitude of an explicit coordinate.
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Show the seven-day forecast instead of current weather.
    #[arg(long)]
    seven_days: bool,

    /// Print the resolved forecast as JSON.
    #[arg(long)]
    json: bool,

    /// Alternative config file path.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skycast=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let forecast = Arc::new(OpenMeteoClient::from_config(&config.api)?);
    let geocoder = Arc::new(OpenMeteoGeocoder::from_config(&config.api)?);
    let reverse_geocoder = Arc::new(NominatimGeocoder::from_config(&config.api)?);

    if args.seven_days {
        run_seven_days(&args, &config, forecast, geocoder, reverse_geocoder).await
    } else {
        run_current(&args, &config, forecast, geocoder).await
    }
}

async fn run_current(
    args: &Args,
    config: &Config,
    forecast: Arc<OpenMeteoClient>,
    geocoder: Arc<OpenMeteoGeocoder>,
) -> anyhow::Result<()> {
    let location = Arc::new(FixedLocationSource::new(config.location.lat_lng()));
    let vm = CurrentWeatherViewModel::new(
        config,
        forecast.clone(),
        forecast,
        location,
        geocoder,
    );

    // A real view would prompt for permission here; a terminal has nothing
    // to prompt for, so events are just logged.
    if let Some(mut events) = vm.take_events() {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    CurrentWeatherEvent::CheckPermission => {
                        debug!("permission check requested");
                    }
                    CurrentWeatherEvent::NavigateToSearchByMap { lat_lng } => {
                        debug!(%lat_lng, "navigation requested");
                    }
                }
            }
        });
    }

    let mut watcher = vm.watch();
    // Explicit coordinate > device location > address, same as the screens.
    match (explicit_coordinate(args), &args.address) {
        (Some(lat_lng), _) => vm.get_weather_by_location(lat_lng),
        (None, Some(address)) => vm.get_weather_by_address(address),
        (None, None) => vm.get_current_location(),
    }

    let (snapshot, hourly_today) = loop {
        let Some(state) = watcher.next().await else {
            bail!("view-model went away before the fetch settled");
        };
        if let Some(error) = &state.error {
            render_error(error);
            bail!("weather lookup failed");
        }
        if !state.is_loading && !state.is_refresh {
            if let Some(snapshot) = state.current_weather {
                break (snapshot, state.hourly_today);
            }
        }
    };

    if args.json {
        let payload = serde_json::json!({
            "current": snapshot,
            "hourly_today": hourly_today,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", describe_target(args, config));
    println!(
        "  {}, {:.1} °C (feels like {:.1} °C)",
        snapshot.condition, snapshot.temperature_c, snapshot.feels_like_c
    );
    println!(
        "  humidity {}%, wind {:.1} km/h",
        snapshot.humidity_pct, snapshot.wind_speed_kmh
    );
    if !hourly_today.is_empty() {
        println!("Today:");
        for entry in &hourly_today {
            println!(
                "  {}  {:>5.1} °C  {}",
                entry.time.format("%H:%M"),
                entry.temperature_c,
                entry.condition
            );
        }
    }

    Ok(())
}

async fn run_seven_days(
    args: &Args,
    config: &Config,
    forecast: Arc<OpenMeteoClient>,
    geocoder: Arc<OpenMeteoGeocoder>,
    reverse_geocoder: Arc<NominatimGeocoder>,
) -> anyhow::Result<()> {
    let vm = SevenDaysViewModel::new(config, forecast, geocoder, reverse_geocoder);

    let mut watcher = vm.watch();
    match (explicit_coordinate(args), &args.address) {
        (Some(lat_lng), _) => vm.get_weather_by_location(lat_lng),
        (None, Some(address)) => vm.get_weather_by_address(address),
        (None, None) => vm.get_weather_by_location(config.location.lat_lng()),
    }

    let state = loop {
        let Some(state) = watcher.next().await else {
            bail!("view-model went away before the fetch settled");
        };
        if let Some(error) = &state.error {
            render_error(error);
            bail!("weather lookup failed");
        }
        if !state.is_loading && !state.is_refresh && !state.seven_days.is_empty() {
            break state;
        }
    };

    if args.json {
        let payload = serde_json::json!({
            "address": state.address,
            "days": state.seven_days,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Seven days in {}", state.address);
    for day in &state.seven_days {
        println!(
            "  {}  {:>5.1} / {:<5.1} °C  {}",
            day.date.format("%a %d %b"),
            day.temp_max_c,
            day.temp_min_c,
            day.condition
        );
    }

    Ok(())
}

fn explicit_coordinate(args: &Args) -> Option<LatLng> {
    match (args.latitude, args.longitude) {
        (Some(latitude), Some(longitude)) => Some(LatLng::new(latitude, longitude)),
        _ => None,
    }
}

fn describe_target(args: &Args, config: &Config) -> String {
    if let Some(lat_lng) = explicit_coordinate(args) {
        format!("Current weather at {lat_lng}")
    } else if let Some(address) = &args.address {
        format!("Current weather in {address}")
    } else {
        format!("Current weather in {}", config.location.label)
    }
}

fn render_error(error: &WeatherError) {
    match error {
        WeatherError::Alert { dialog, .. } => {
            eprintln!("{}", dialog.title);
            eprintln!("  {}", dialog.message);
        }
        other => eprintln!("{other}"),
    }
}
