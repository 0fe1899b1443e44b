use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::dataset::source::Location;

/// Published track-length table.
pub const TRACK_LENGTHS_URL: &str = "https://jroefive.github.io/track_length_combined";

/// Published set-placement table.
pub const SET_PLACEMENT_URL: &str = "https://jroefive.github.io/set_placement_plot";

/// Application configuration loaded from TOML config file.
/// All fields have defaults; the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Band named in user-facing messages.
    pub band: String,
    /// Where the two tables come from.
    pub data: DataConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            band: crate::DEFAULT_BAND.to_string(),
            data: DataConfig::default(),
        }
    }
}

/// Dataset locations. A local path, when set, wins over its URL.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub track_lengths_url: String,
    pub set_placement_url: String,
    pub track_lengths_path: Option<PathBuf>,
    pub set_placement_path: Option<PathBuf>,
    /// Whole-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            track_lengths_url: TRACK_LENGTHS_URL.to_string(),
            set_placement_url: SET_PLACEMENT_URL.to_string(),
            track_lengths_path: None,
            set_placement_path: None,
            timeout_secs: 30,
        }
    }
}

impl DataConfig {
    pub fn track_lengths(&self) -> Location {
        pick_location(&self.track_lengths_path, &self.track_lengths_url)
    }

    pub fn set_placement(&self) -> Location {
        pick_location(&self.set_placement_path, &self.set_placement_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn pick_location(path: &Option<PathBuf>, url: &str) -> Location {
    match path {
        Some(p) => Location::Local(p.clone()),
        None => Location::Remote(url.to_string()),
    }
}

impl AppConfig {
    /// Load config from `~/.config/showdigest/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
