//! Application configuration: defaults, file loading, validation.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, EventsConfig, LocationDefaults};
