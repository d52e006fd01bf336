//! Pipeline configuration.
//!
//! Every field has a default, so a missing or partial `weather.toml` is valid.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "weather.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the raw and clean CSV files, the database and exports.
    pub data_dir: PathBuf,
    /// Hourly forecast page to scrape.
    pub url: String,
    /// Source identity stamped on every scraped row.
    pub city: String,
    pub user_agent: String,
    /// How long to wait for the hourly table to appear.
    pub wait_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            url: "https://www.timeanddate.com/weather/usa/washington-dc/hourly".to_string(),
            city: "Washington, DC".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0 Safari/537.36"
                .to_string(),
            wait_timeout_secs: 15,
            poll_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Loads the config file at `path`, or the defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn raw_file(&self) -> PathBuf {
        self.data_dir.join("raw_weather.csv")
    }

    pub fn clean_file(&self) -> PathBuf {
        self.data_dir.join("clean_weather.csv")
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join("weather.db")
    }

    pub fn dashboard_dir(&self) -> PathBuf {
        self.data_dir.join("dashboard")
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn should_default_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("weather.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.raw_file(), PathBuf::from("data/raw_weather.csv"));
        assert_eq!(config.database_file(), PathBuf::from("data/weather.db"));
    }

    #[test]
    fn should_fill_missing_fields_with_defaults() {
        let config = Config::from_toml(
            r#"
            city = "Boston, MA"
            wait_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.city, "Boston, MA");
        assert_eq!(config.wait_timeout(), Duration::from_secs(30));
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn should_override_data_dir() {
        let config = Config::default().with_data_dir(Some(PathBuf::from("/tmp/wx")));

        assert_eq!(config.clean_file(), PathBuf::from("/tmp/wx/clean_weather.csv"));
        assert_eq!(config.dashboard_dir(), PathBuf::from("/tmp/wx/dashboard"));
    }

    #[test]
    fn should_reject_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.toml");
        fs::write(&path, "wait_timeout_secs = \"soon\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
