use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    RacePaceError,
    prediction::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_S},
    shell::View,
};

const CONFIG_DIR_NAME: &str = "racepace";
const CONFIG_FILE_NAME: &str = "config.json";
/// A zero timeout would fail every request before it is sent
pub const MIN_TIMEOUT_S: u64 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub request_timeout_s: u64,
    pub start_view: View,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_s: DEFAULT_TIMEOUT_S,
            start_view: View::Dashboard,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        Some(
            dirs::config_dir()?
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        )
    }

    /// Reads the config from the user's config directory, `None` if there is no file yet.
    pub fn from_local_file() -> Result<Option<Self>, RacePaceError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, RacePaceError> {
        if !path.exists() {
            return Ok(None);
        }
        let file =
            std::fs::File::open(path).map_err(|e| RacePaceError::ConfigIOError { source: e })?;
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|e| RacePaceError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<PathBuf, RacePaceError> {
        let config_path = Self::default_path().ok_or(RacePaceError::NoConfigDir)?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), RacePaceError> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| RacePaceError::ConfigIOError { source: e })?;
        }

        let file =
            std::fs::File::create(path).map_err(|e| RacePaceError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| RacePaceError::ConfigSerializeError { source: e })
    }

    /// Request timeout, never shorter than [`MIN_TIMEOUT_S`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s.max(MIN_TIMEOUT_S))
    }
}
