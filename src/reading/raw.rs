//! As-scraped rows of `raw_weather.csv`.

use serde::{Deserialize, Serialize};

use super::Reading;

/// One hourly row exactly as shown on the page. Every column may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawReading {
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "Time", default)]
    pub time: String,
    #[serde(rename = "Temperature", default)]
    pub temperature: String,
    #[serde(rename = "Weather", default)]
    pub weather: String,
    #[serde(rename = "Wind", default)]
    pub wind: String,
    #[serde(rename = "Humidity", default)]
    pub humidity: String,
    #[serde(rename = "Scraped_At", default)]
    pub scraped_at: String,
}

impl Reading for RawReading {
    fn city(&self) -> &str {
        self.city.trim()
    }

    fn time(&self) -> &str {
        self.time.trim()
    }
}
