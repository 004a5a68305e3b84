use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::UnitSystem;

/// Environment variable consulted before the config file for the API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Weather-source settings (credential and preferred units).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    /// "metric" or "imperial"; metric when absent.
    pub units: Option<String>,
}

/// City-catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Override for the catalog endpoint; the public opendatasoft
    /// dataset URL when absent.
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// api_key = "..."
/// units = "metric"
///
/// [catalog]
/// base_url = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/geonames-all-cities-with-a-population-1000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Resolve the OpenWeather API key: environment first, file second.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.weather.api_key.as_deref())
    }

    /// Like [`Config::api_key`], but with a hint when nothing is configured.
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `cityweather configure` and enter your API key, \
                 or set {API_KEY_ENV}."
            )
        })
    }

    /// Preferred unit system, metric when the file does not say otherwise.
    pub fn default_units(&self) -> Result<UnitSystem> {
        match self.weather.units.as_deref() {
            Some(s) => UnitSystem::try_from(s),
            None => Ok(UnitSystem::Metric),
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.weather.api_key = Some(api_key);
    }

    pub fn set_default_units(&mut self, units: UnitSystem) {
        self.weather.units = Some(units.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "city-weather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn resolve_api_key(env: Option<String>, file: Option<&str>) -> Option<String> {
    env.filter(|s| !s.trim().is_empty())
        .or_else(|| file.map(str::to_string).filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_api_key() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("Hint: run `cityweather configure`"));
    }

    #[test]
    fn env_key_takes_precedence_over_file() {
        let resolved = resolve_api_key(Some("ENV_KEY".into()), Some("FILE_KEY"));
        assert_eq!(resolved.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn blank_env_key_falls_back_to_file() {
        let resolved = resolve_api_key(Some("  ".into()), Some("FILE_KEY"));
        assert_eq!(resolved.as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn set_api_key_is_visible_through_resolution() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        assert_eq!(resolve_api_key(None, cfg.weather.api_key.as_deref()).as_deref(), Some("KEY"));
    }

    #[test]
    fn units_default_to_metric() {
        let cfg = Config::default();
        assert_eq!(cfg.default_units().unwrap(), UnitSystem::Metric);
    }

    #[test]
    fn configured_units_are_parsed() {
        let mut cfg = Config::default();
        cfg.set_default_units(UnitSystem::Imperial);
        assert_eq!(cfg.default_units().unwrap(), UnitSystem::Imperial);
    }

    #[test]
    fn bad_units_string_errors() {
        let cfg: Config = toml::from_str("[weather]\nunits = \"kelvin\"\n").unwrap();
        assert!(cfg.default_units().is_err());
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_default_units(UnitSystem::Imperial);
        cfg.catalog.base_url = Some("http://localhost:9000".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();

        assert_eq!(back.weather.api_key.as_deref(), Some("KEY"));
        assert_eq!(back.default_units().unwrap(), UnitSystem::Imperial);
        assert_eq!(back.catalog.base_url.as_deref(), Some("http://localhost:9000"));
    }
}
