//! Extracts hourly rows from the forecast page's `#wt-hbh` table.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;
use scraper::{ElementRef, Html, Selector};

pub const TABLE_ROWS: &str = "table#wt-hbh tbody tr";

// Zero-based `td` positions within a row; the first cell is the weather icon.
const TEMPERATURE_CELL: usize = 1;
const WEATHER_CELL: usize = 2;
const WIND_CELL: usize = 4;
const HUMIDITY_CELL: usize = 6;

/// One table row, text as shown on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub clock: NaiveTime,
    /// Set on the first row of each day, e.g. `Tue, Oct 20`.
    pub day_label: Option<String>,
    pub temperature: String,
    pub weather: String,
    pub wind: String,
    pub humidity: String,
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub rows: Vec<HourlyRow>,
    /// Rows missing their header cell, a data cell or a readable clock.
    pub skipped: usize,
}

/// True once the page carries at least one hourly row.
pub fn has_hourly_table(html: &str) -> bool {
    let Ok(rows) = selector(TABLE_ROWS) else {
        return false;
    };
    Html::parse_document(html).select(&rows).next().is_some()
}

pub fn extract_rows(html: &str) -> Result<Extraction> {
    let document = Html::parse_document(html);
    let row_selector = selector(TABLE_ROWS)?;
    let th_selector = selector("th")?;
    let td_selector = selector("td")?;

    let mut extraction = Extraction::default();

    for (idx, row) in document.select(&row_selector).enumerate() {
        match parse_row(row, &th_selector, &td_selector) {
            Ok(hourly) => extraction.rows.push(hourly),
            Err(e) => {
                warn!("Skipping row {}: {}", idx + 1, e);
                extraction.skipped += 1;
            }
        }
    }

    Ok(extraction)
}

fn parse_row(row: ElementRef, th: &Selector, td: &Selector) -> Result<HourlyRow> {
    let header = row.select(th).next().ok_or_else(|| anyhow!("no time cell"))?;
    let mut pieces = header.text().map(str::trim).filter(|t| !t.is_empty());

    let clock_text = pieces.next().ok_or_else(|| anyhow!("empty time cell"))?;
    let clock = parse_clock(clock_text).ok_or_else(|| anyhow!("unreadable time `{}`", clock_text))?;
    let day_label = Some(pieces.collect::<Vec<_>>().join(" ")).filter(|l| !l.is_empty());

    let cells: Vec<String> = row.select(td).map(cell_text).collect();
    if cells.len() <= HUMIDITY_CELL {
        return Err(anyhow!("expected {} data cells, found {}", HUMIDITY_CELL + 1, cells.len()));
    }

    Ok(HourlyRow {
        clock,
        day_label,
        temperature: cells[TEMPERATURE_CELL].clone(),
        weather: cells[WEATHER_CELL].clone(),
        wind: cells[WIND_CELL].clone(),
        humidity: cells[HUMIDITY_CELL].clone(),
    })
}

fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector `{}`: {}", css, e))
}

/// Reads `2:00 pm`, `12:00 AM` or `14:00`.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let lower = text.trim().to_lowercase();
    let (clock, pm) = if let Some(c) = lower.strip_suffix("am") {
        (c, Some(false))
    } else if let Some(c) = lower.strip_suffix("pm") {
        (c, Some(true))
    } else {
        (lower.as_str(), None)
    };

    let (h, m) = clock.trim().split_once(':')?;
    let mut hour: u32 = h.trim().parse().ok()?;
    let minute: u32 = m.trim().parse().ok()?;

    if let Some(pm) = pm {
        if hour == 0 || hour > 12 {
            return None;
        }
        hour = hour % 12 + if pm { 12 } else { 0 };
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Reads `Tue, Oct 20` (or `Oct 20`, `20 Oct`) as the date nearest `anchor`.
pub fn parse_day_label(label: &str, anchor: NaiveDate) -> Option<NaiveDate> {
    let month_day = label.rsplit(',').next()?.trim();

    let date = ["%b %d %Y", "%d %b %Y", "%B %d %Y"].iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&format!("{} {}", month_day, anchor.year()), fmt).ok()
    })?;

    // A page scraped around New Year shows dates from the neighbouring year.
    if date < anchor - Duration::days(183) {
        date.with_year(anchor.year() + 1)
    } else if date > anchor + Duration::days(183) {
        date.with_year(anchor.year() - 1)
    } else {
        Some(date)
    }
}

/// Turns the page's clock times into full timestamps, row by row.
///
/// The first row is dated by the anchor (the scrape date), day labels set the
/// date explicitly, and an unlabelled clock that doesn't move forward means
/// the table crossed midnight.
#[derive(Debug)]
pub struct TimestampResolver {
    anchor: NaiveDate,
    date: NaiveDate,
    last: Option<NaiveTime>,
}

impl TimestampResolver {
    pub fn new(anchor: NaiveDate) -> Self {
        TimestampResolver {
            anchor,
            date: anchor,
            last: None,
        }
    }

    pub fn resolve(&mut self, clock: NaiveTime, day_label: Option<&str>) -> NaiveDateTime {
        match day_label.and_then(|l| parse_day_label(l, self.anchor)) {
            Some(date) => self.date = date,
            None => {
                if matches!(self.last, Some(last) if clock <= last) {
                    self.date = self.date.succ_opt().unwrap_or(self.date);
                }
            }
        }

        self.last = Some(clock);
        self.date.and_time(clock)
    }
}

// -- Tests -------------------------------------------------------------------
