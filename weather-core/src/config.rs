use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{classify::IconSet, forecast::TimeSlot};

/// City shown when nothing has been searched yet.
pub const DEFAULT_CITY: &str = "Delhi";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeather credentials and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: default_base_url(), timeout_secs: default_timeout() }
    }
}

/// How the dashboard is laid out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Upcoming days listed by default (3 or 5 in practice).
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,

    #[serde(default)]
    pub icons: IconSet,

    /// Timeline slots; the four-slot Morning..Night layout when omitted.
    #[serde(default = "TimeSlot::defaults")]
    pub slots: Vec<TimeSlot>,
}

const fn default_forecast_days() -> usize {
    3
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            forecast_days: default_forecast_days(),
            icons: IconSet::default(),
            slots: TimeSlot::defaults(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// last_city = "Paris"
///
/// [openweather]
/// api_key = "..."
///
/// [display]
/// forecast_days = 5
/// icons = "emoji"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Last city loaded successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_city: Option<String>,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load config from the platform config dir, or defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Result<String> {
        Self::resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.openweather.api_key.as_deref())
    }

    fn resolve_api_key(from_env: Option<String>, stored: Option<&str>) -> Result<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| stored.filter(|k| !k.trim().is_empty()).map(str::to_string))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                )
            })
    }

    /// City to show on startup.
    pub fn startup_city(&self) -> &str {
        self.last_city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    pub fn remember_city(&mut self, city: &str) {
        self.last_city = Some(city.to_string());
    }
}
