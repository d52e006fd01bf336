//! Validated, unit-normalized rows of `clean_weather.csv`.

use serde::{Deserialize, Serialize};

use super::Reading;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanReading {
    #[serde(rename = "City")]
    pub city: String,
    /// `YYYY-MM-DD HH:MM`
    #[serde(rename = "Time")]
    pub time: String,
    /// `YYYY-MM-DD`
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature_F")]
    pub temperature_f: f64,
    #[serde(rename = "Temperature_C")]
    pub temperature_c: f64,
    #[serde(rename = "Weather")]
    pub weather: String,
    #[serde(rename = "Wind_mph")]
    pub wind_mph: f64,
    #[serde(rename = "Wind_kmh")]
    pub wind_kmh: f64,
    #[serde(rename = "Humidity_pct")]
    pub humidity_pct: u8,
    #[serde(rename = "Scraped_At", default)]
    pub scraped_at: String,
    /// Fields that were forward-filled, `;`-separated.
    #[serde(rename = "Filled", default)]
    pub filled: String,
}

impl Reading for CleanReading {
    fn city(&self) -> &str {
        &self.city
    }

    fn time(&self) -> &str {
        &self.time
    }
}
