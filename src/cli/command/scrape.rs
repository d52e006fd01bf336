//! Scrape the hourly table and append unseen rows to the raw file.

use std::{fmt, path::Path};

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use log::info;

use crate::{
    cli::create_spinner,
    config::Config,
    download::{build_client, fetch_when_ready, Wait},
    extract::{extract_rows, has_hourly_table, HourlyRow, TimestampResolver},
    flatfile,
    reading::{retain_new, RawReading},
};

use super::print_table;

const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Default, PartialEq)]
pub struct ScrapeReport {
    pub found: usize,
    pub skipped: usize,
    pub already_present: usize,
    pub appended: usize,
}

impl fmt::Display for ScrapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows found:           {}", self.found)?;
        writeln!(f, "Rows skipped:         {}", self.skipped)?;
        writeln!(f, "Rows already present: {}", self.already_present)?;
        write!(f, "Rows appended:        {}", self.appended)
    }
}

pub async fn scrape(config: &Config) -> Result<String> {
    let client = build_client(&config.user_agent)?;
    let wait = Wait {
        timeout: config.wait_timeout(),
        poll: config.poll_interval(),
    };

    let bar = create_spinner(format!("Loading {}...", config.url));
    let page = fetch_when_ready(&client, &config.url, wait, has_hourly_table).await;
    bar.finish_and_clear();
    let html = page?;

    let extraction = extract_rows(&html)?;
    let readings = to_raw_readings(&extraction.rows, &config.city, Local::now().naive_local());
    let found = readings.len();

    let raw_path = config.raw_file();
    let (fresh, already_present) = append_new(&raw_path, readings)?;

    let report = ScrapeReport {
        found,
        skipped: extraction.skipped,
        already_present,
        appended: fresh.len(),
    };
    println!("{}", report);

    let header: Vec<String> = ["City", "Time", "Temperature", "Weather", "Wind", "Humidity"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let preview: Vec<Vec<String>> = fresh
        .iter()
        .take(PREVIEW_ROWS)
        .map(|r| {
            vec![
                r.city.clone(),
                r.time.clone(),
                r.temperature.clone(),
                r.weather.clone(),
                r.wind.clone(),
                r.humidity.clone(),
            ]
        })
        .collect();
    print_table("New rows:", &header, &preview);

    Ok(raw_path.to_string_lossy().to_string())
}

/// Stamps extracted rows with `city`, full timestamps and the scrape time.
pub fn to_raw_readings(rows: &[HourlyRow], city: &str, scraped_at: NaiveDateTime) -> Vec<RawReading> {
    let mut resolver = TimestampResolver::new(scraped_at.date());
    let scraped_at = scraped_at.format("%Y-%m-%dT%H:%M:%S").to_string();

    rows.iter()
        .map(|row| {
            let time = resolver.resolve(row.clock, row.day_label.as_deref());
            RawReading {
                city: city.to_string(),
                time: time.format("%Y-%m-%d %H:%M").to_string(),
                temperature: row.temperature.clone(),
                weather: row.weather.clone(),
                wind: row.wind.clone(),
                humidity: row.humidity.clone(),
                scraped_at: scraped_at.clone(),
            }
        })
        .collect()
}

/// Appends readings whose key isn't in the raw file yet. The file is left
/// untouched when nothing is new.
pub fn append_new(raw_path: &Path, readings: Vec<RawReading>) -> Result<(Vec<RawReading>, usize)> {
    let mut existing: Vec<RawReading> = flatfile::read_records_if_exists(raw_path)?;
    let (fresh, already_present) = retain_new(&existing, readings);

    if fresh.is_empty() {
        info!("No new rows for {}", raw_path.display());
        return Ok((fresh, already_present));
    }

    existing.extend(fresh.iter().cloned());
    flatfile::write_records(raw_path, &existing)?;

    Ok((fresh, already_present))
}

// -- Tests -------------------------------------------------------------------
