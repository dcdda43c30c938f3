//! Persisted map-style preference.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::usecase::{DataStream, MapStylePreferences};
use crate::error::WeatherError;
use crate::flow::StateContainer;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    dark_mode: bool,
}

/// TOML-backed preference store.
///
/// `dark_mode()` replays the current value and then streams every later
/// change made through this store instance.
pub struct MapStyleStore {
    path: PathBuf,
    state: StateContainer<bool>,
}

impl MapStyleStore {
    /// Open the store at `path`; a missing file means defaults.
    pub fn load(path: PathBuf) -> Result<Self, WeatherError> {
        let dark_mode = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                WeatherError::other(format!(
                    "failed to read preferences '{}': {e}",
                    path.display()
                ))
            })?;
            let prefs: PrefsFile = toml::from_str(&content).map_err(|e| {
                WeatherError::other(format!(
                    "failed to parse preferences '{}': {e}",
                    path.display()
                ))
            })?;
            prefs.dark_mode
        } else {
            false
        };

        Ok(Self {
            path,
            state: StateContainer::new(dark_mode),
        })
    }

    /// `~/.config/skycast/preferences.toml` (or the platform equivalent).
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("skycast").join("preferences.toml")
    }
}

#[async_trait]
impl MapStylePreferences for MapStyleStore {
    fn dark_mode(&self) -> DataStream<bool> {
        let watcher = self.state.watch();
        stream::unfold(watcher, |mut watcher| async move {
            watcher
                .next()
                .await
                .map(|value| (Ok::<_, WeatherError>(value), watcher))
        })
        .boxed()
    }

    async fn set_dark_mode(&self, enabled: bool) -> Result<(), WeatherError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::other(format!(
                    "failed to create preference directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        let content = toml::to_string(&PrefsFile { dark_mode: enabled })
            .map_err(|e| WeatherError::other(format!("failed to encode preferences: {e}")))?;
        fs::write(&self.path, content).map_err(|e| {
            WeatherError::other(format!(
                "failed to write preferences '{}': {e}",
                self.path.display()
            ))
        })?;

        debug!(enabled, "map style persisted");
        self.state.update(|value| *value = enabled);
        Ok(())
    }
}
