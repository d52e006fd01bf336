//! Turns raw scraped rows into validated, unit-normalized clean rows.
//!
//! Cleaning is a pure function of its input: exact duplicates go first, then
//! each field is parsed and range-checked, rows sharing a natural key collapse
//! to the most recently scraped one, and gaps are forward-filled per city.
//! Rows with a numeric gap and nothing earlier to fill it from are omitted.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};

use chrono::{NaiveDateTime, Timelike};
use log::warn;

use crate::{
    error::FieldError,
    reading::{
        units::{celsius_to_fahrenheit, fahrenheit_to_celsius, kmh_to_mph, mph_to_kmh, ms_to_mph, round_to},
        has_unique_keys, CleanReading, RawReading,
    },
};

pub const TEMPERATURE_RANGE_F: (f64, f64) = (-80.0, 140.0);
pub const WIND_RANGE_MPH: (f64, f64) = (0.0, 250.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const UNKNOWN_CONDITION: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Temperature,
    Weather,
    Wind,
    Humidity,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Temperature, Field::Weather, Field::Wind, Field::Humidity];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Temperature => "temperature",
            Field::Weather => "weather",
            Field::Wind => "wind",
            Field::Humidity => "humidity",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStats {
    /// Rows with a valid value before filling.
    pub present: usize,
    pub unparseable: usize,
    pub out_of_range: usize,
    pub filled: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    pub rows_before: usize,
    pub exact_duplicates: usize,
    /// Rows that couldn't be read, or lack a usable city or timestamp.
    pub rejected: usize,
    pub key_duplicates: usize,
    /// Rows left once duplicates and rejects are gone; the completeness denominator.
    pub candidates: usize,
    pub unfillable: usize,
    pub rows_after: usize,
    pub fields: BTreeMap<Field, FieldStats>,
}

impl CleanReport {
    pub fn field(&self, field: Field) -> FieldStats {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldStats {
        self.fields.entry(field).or_default()
    }
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows before cleaning:      {}", self.rows_before)?;
        writeln!(f, "Exact duplicates dropped:  {}", self.exact_duplicates)?;
        writeln!(f, "Rows rejected:             {}", self.rejected)?;
        writeln!(f, "Key duplicates dropped:    {}", self.key_duplicates)?;
        writeln!(f, "Rows omitted (unfillable): {}", self.unfillable)?;
        writeln!(f, "Rows after cleaning:       {}", self.rows_after)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:>12} {:>12} {:>12} {:>8}",
            "Field", "Complete", "Unparseable", "Out of range", "Filled"
        )?;
        for field in Field::ALL {
            let stats = self.field(field);
            let pct = if self.candidates == 0 {
                100.0
            } else {
                stats.present as f64 * 100.0 / self.candidates as f64
            };
            writeln!(
                f,
                "{:<12} {:>5}/{:<6} {:>12} {:>12} {:>8}   ({:.1}%)",
                field.name(),
                stats.present,
                self.candidates,
                stats.unparseable,
                stats.out_of_range,
                stats.filled,
                pct
            )?;
        }
        Ok(())
    }
}

/// A raw row with a valid key and each field parsed.
#[derive(Debug)]
struct Parsed {
    city: String,
    time: NaiveDateTime,
    scraped_at: Option<NaiveDateTime>,
    scraped_at_text: String,
    temperature: Result<f64, FieldError>,
    weather: Result<String, FieldError>,
    wind: Result<f64, FieldError>,
    humidity: Result<u8, FieldError>,
}

pub fn clean(raw: &[RawReading]) -> (Vec<CleanReading>, CleanReport) {
    let mut report = CleanReport {
        rows_before: raw.len(),
        ..CleanReport::default()
    };

    let unique = drop_exact_duplicates(raw, &mut report);
    let parsed = unique
        .into_iter()
        .filter_map(|r| {
            let parsed = parse(r);
            if parsed.is_none() {
                warn!("Rejecting row with city `{}` and time `{}`", r.city, r.time);
                report.rejected += 1;
            }
            parsed
        })
        .collect();
    let mut candidates = keep_latest_per_key(parsed, &mut report);
    candidates.sort_by(|a, b| (&a.city, a.time).cmp(&(&b.city, b.time)));

    report.candidates = candidates.len();
    tally_fields(&candidates, &mut report);

    let cleaned = fill_and_derive(candidates, &mut report);
    report.rows_after = cleaned.len();
    debug_assert!(has_unique_keys(&cleaned));

    (cleaned, report)
}

fn drop_exact_duplicates<'a>(raw: &'a [RawReading], report: &mut CleanReport) -> Vec<&'a RawReading> {
    let mut seen = HashSet::new();
    let unique: Vec<&RawReading> = raw.iter().filter(|r| seen.insert(*r)).collect();
    report.exact_duplicates = raw.len() - unique.len();
    unique
}

fn parse(raw: &RawReading) -> Option<Parsed> {
    let city = raw.city.trim();
    if city.is_empty() {
        return None;
    }
    // Keys compare at the minute precision they are written out with.
    let time = parse_timestamp(&raw.time)?.with_second(0)?.with_nanosecond(0)?;
    let scraped_at = parse_timestamp(&raw.scraped_at);

    Some(Parsed {
        city: city.to_string(),
        time,
        scraped_at,
        scraped_at_text: if scraped_at.is_some() {
            raw.scraped_at.trim().to_string()
        } else {
            String::new()
        },
        temperature: parse_temperature(&raw.temperature),
        weather: parse_condition(&raw.weather),
        wind: parse_wind(&raw.wind),
        humidity: parse_humidity(&raw.humidity),
    })
}

fn keep_latest_per_key(parsed: Vec<Parsed>, report: &mut CleanReport) -> Vec<Parsed> {
    let mut index: HashMap<(String, NaiveDateTime), usize> = HashMap::new();
    let mut kept: Vec<Parsed> = Vec::new();

    for row in parsed {
        let key = (row.city.clone(), row.time);
        match index.get(&key) {
            Some(&i) => {
                report.key_duplicates += 1;
                if row.scraped_at >= kept[i].scraped_at {
                    kept[i] = row;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(row);
            }
        }
    }

    kept
}

fn tally_fields(rows: &[Parsed], report: &mut CleanReport) {
    for row in rows {
        let outcomes = [
            (Field::Temperature, row.temperature.as_ref().err()),
            (Field::Weather, row.weather.as_ref().err()),
            (Field::Wind, row.wind.as_ref().err()),
            (Field::Humidity, row.humidity.as_ref().err()),
        ];

        for (field, error) in outcomes {
            let stats = report.field_mut(field);
            let Some(error) = error else {
                stats.present += 1;
                continue;
            };

            match error {
                FieldError::Missing => continue,
                FieldError::Unparseable(_) => stats.unparseable += 1,
                FieldError::OutOfRange { .. } => stats.out_of_range += 1,
            }
            warn!("{} {} {}: {}", row.city, row.time, field.name(), error);
        }
    }
}

/// Last observed value of each field within the current city.
#[derive(Default)]
struct Carry {
    temperature: Option<f64>,
    weather: Option<String>,
    wind: Option<f64>,
    humidity: Option<u8>,
}

fn fill_and_derive(rows: Vec<Parsed>, report: &mut CleanReport) -> Vec<CleanReading> {
    let mut cleaned = Vec::with_capacity(rows.len());
    let mut carry = Carry::default();
    let mut city: Option<String> = None;

    for row in rows {
        if city.as_deref() != Some(row.city.as_str()) {
            carry = Carry::default();
            city = Some(row.city.clone());
        }

        let mut filled = Vec::new();

        let temperature = fill(row.temperature.ok(), &mut carry.temperature, Field::Temperature, &mut filled);
        let wind = fill(row.wind.ok(), &mut carry.wind, Field::Wind, &mut filled);
        let humidity = fill(row.humidity.ok(), &mut carry.humidity, Field::Humidity, &mut filled);
        let weather = fill(row.weather.ok(), &mut carry.weather, Field::Weather, &mut filled)
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string());

        let (Some(temperature_f), Some(wind_mph), Some(humidity_pct)) = (temperature, wind, humidity) else {
            warn!("Omitting {} {}: nothing earlier to fill from", row.city, row.time);
            report.unfillable += 1;
            continue;
        };

        for field in &filled {
            report.field_mut(*field).filled += 1;
        }
        if !filled.contains(&Field::Weather) && weather == UNKNOWN_CONDITION && carry.weather.is_none() {
            report.field_mut(Field::Weather).filled += 1;
            filled.push(Field::Weather);
        }

        cleaned.push(CleanReading {
            city: row.city,
            time: row.time.format(TIME_FORMAT).to_string(),
            date: row.time.format(DATE_FORMAT).to_string(),
            temperature_f,
            temperature_c: round_to(fahrenheit_to_celsius(temperature_f), 1),
            weather,
            wind_mph,
            wind_kmh: round_to(mph_to_kmh(wind_mph), 2),
            humidity_pct,
            scraped_at: row.scraped_at_text,
            filled: filled.iter().map(Field::name).collect::<Vec<_>>().join(";"),
        });
    }

    cleaned
}

/// Returns the observed value, or the carried one (recording `field` as filled).
fn fill<T: Clone>(observed: Option<T>, carried: &mut Option<T>, field: Field, filled: &mut Vec<Field>) -> Option<T> {
    match observed {
        Some(value) => {
            *carried = Some(value.clone());
            Some(value)
        }
        None => {
            let value = carried.clone();
            if value.is_some() {
                filled.push(field);
            }
            value
        }
    }
}

// -- Field parsers -----------------------------------------------------------

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Parses a temperature into °F.
pub fn parse_temperature(text: &str) -> Result<f64, FieldError> {
    let (value, unit) = split_number(text)?;
    let fahrenheit = match unit.as_str() {
        "" | "f" => value,
        "c" => celsius_to_fahrenheit(value),
        _ => return Err(FieldError::Unparseable(text.trim().to_string())),
    };
    within(fahrenheit, TEMPERATURE_RANGE_F)
}

/// Parses a wind speed into mph.
pub fn parse_wind(text: &str) -> Result<f64, FieldError> {
    let lower = text.trim().to_lowercase();
    if lower == "no wind" || lower == "calm" {
        return Ok(0.0);
    }

    let (value, unit) = split_number(text)?;
    let mph = match unit.as_str() {
        "" | "mph" => value,
        "km/h" | "kmh" | "kph" => kmh_to_mph(value),
        "m/s" => ms_to_mph(value),
        _ => return Err(FieldError::Unparseable(text.trim().to_string())),
    };
    within(mph, WIND_RANGE_MPH)
}

pub fn parse_humidity(text: &str) -> Result<u8, FieldError> {
    let (value, unit) = split_number(text)?;
    if !unit.is_empty() && unit != "%" {
        return Err(FieldError::Unparseable(text.trim().to_string()));
    }
    within(value, HUMIDITY_RANGE_PCT).map(|v| v.round() as u8)
}

pub fn parse_condition(text: &str) -> Result<String, FieldError> {
    let condition = text.trim().trim_end_matches('.').trim();
    if is_placeholder(condition) {
        Err(FieldError::Missing)
    } else {
        Ok(condition.to_string())
    }
}

/// Splits `50 °F` into `(50.0, "f")`: the unit is lowercased with degree signs
/// and spaces removed.
fn split_number(text: &str) -> Result<(f64, String), FieldError> {
    let text = text.trim();
    if is_placeholder(text) {
        return Err(FieldError::Missing);
    }

    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let value: f64 = text[..end]
        .parse()
        .map_err(|_| FieldError::Unparseable(text.to_string()))?;
    let unit: String = text[end..]
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '°')
        .collect::<String>()
        .to_lowercase();

    Ok((value, unit))
}

fn within(value: f64, (min, max): (f64, f64)) -> Result<f64, FieldError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::OutOfRange { value, min, max })
    }
}

fn is_placeholder(text: &str) -> bool {
    matches!(text.to_lowercase().as_str(), "" | "-" | "--" | "n/a" | "na" | "nan" | "none")
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn raw(time: &str, temp: &str, humidity: &str, wind: &str, weather: &str) -> RawReading {
        RawReading {
            city: "Washington, DC".to_string(),
            time: time.to_string(),
            temperature: temp.to_string(),
            weather: weather.to_string(),
            wind: wind.to_string(),
            humidity: humidity.to_string(),
            scraped_at: "2024-01-01T13:00:00".to_string(),
        }
    }

    #[test]
    fn should_clean_reference_row() {
        let (rows, report) = clean(&[raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny")]);

        assert_eq!(report.rows_after, 1);
        let row = &rows[0];
        assert_eq!(row.time, "2024-01-01 14:00");
        assert_eq!(row.date, "2024-01-01");
        assert_eq!(row.temperature_f, 50.0);
        assert!((row.temperature_c - 10.0).abs() < 0.05);
        assert_eq!(row.humidity_pct, 60);
        assert_eq!(row.wind_mph, 10.0);
        assert!((row.wind_kmh - 16.09).abs() < 0.005);
        assert_eq!(row.weather, "Sunny");
        assert_eq!(row.filled, "");
    }

    #[test]
    fn should_keep_conversions_consistent() {
        let input: Vec<RawReading> = (0..24)
            .map(|h| {
                raw(
                    &format!("2024-01-01 {:02}:00", h),
                    &format!("{} °F", 20 + h * 3),
                    "50%",
                    &format!("{} mph", h),
                    "Clear.",
                )
            })
            .collect();

        let (rows, _) = clean(&input);

        assert_eq!(rows.len(), 24);
        for row in rows {
            assert!((row.temperature_c - (row.temperature_f - 32.0) * 5.0 / 9.0).abs() <= 0.05);
            assert!((row.wind_kmh - row.wind_mph * 1.60934).abs() <= 0.005);
        }
    }

    #[test]
    fn should_drop_exact_duplicates() {
        let row = raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny.");
        let (rows, report) = clean(&[row.clone(), row.clone(), row]);

        assert_eq!(rows.len(), 1);
        assert_eq!(report.exact_duplicates, 2);
        assert_eq!(report.key_duplicates, 0);
    }

    #[test]
    fn should_keep_latest_scrape_per_key() {
        let mut early = raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny.");
        early.scraped_at = "2024-01-01T08:00:00".to_string();
        let mut late = raw("2024-01-01 14:00", "53 °F", "55%", "12 mph", "Cloudy.");
        late.scraped_at = "2024-01-01T12:00:00".to_string();

        let (rows, report) = clean(&[late, early]);

        assert_eq!(rows.len(), 1);
        assert_eq!(report.key_duplicates, 1);
        assert_eq!(rows[0].temperature_f, 53.0);
        assert_eq!(rows[0].weather, "Cloudy");
    }

    #[test]
    fn should_collapse_times_differing_only_by_seconds() {
        let mut early = raw("2024-01-01 14:00:00", "50 °F", "60%", "10 mph", "Sunny.");
        early.scraped_at = "2024-01-01T08:00:00".to_string();
        let mut late = raw("2024-01-01T14:00:30", "53 °F", "55%", "12 mph", "Cloudy.");
        late.scraped_at = "2024-01-01T12:00:00".to_string();

        let (rows, report) = clean(&[early, late]);

        assert!(has_unique_keys(&rows));
        assert_eq!(rows.len(), 1);
        assert_eq!(report.key_duplicates, 1);
        assert_eq!(rows[0].time, "2024-01-01 14:00");
        assert_eq!(rows[0].temperature_f, 53.0);
    }

    #[test]
    fn should_never_emit_duplicate_keys() {
        // Small LCG so the mix of times, cities and values is varied but repeatable.
        let mut seed: u64 = 42;
        let mut next = move |n: u64| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) % n
        };

        let cities = ["Washington, DC", "Boston, MA", ""];
        let temps = ["50 °F", "", "200 °F", "abc", "10 °C"];
        let input: Vec<RawReading> = (0..300)
            .map(|_| RawReading {
                city: cities[next(3) as usize].to_string(),
                time: format!("2024-01-0{} {:02}:00", 1 + next(2), next(6)),
                temperature: temps[next(5) as usize].to_string(),
                weather: "Sunny.".to_string(),
                wind: format!("{} mph", next(30)),
                humidity: format!("{}%", next(120)),
                scraped_at: format!("2024-01-01T{:02}:00:00", next(24)),
            })
            .collect();

        let (rows, report) = clean(&input);

        assert!(has_unique_keys(&rows));
        assert!(rows.len() <= 2 * 2 * 6);
        assert_eq!(
            report.rows_before,
            report.exact_duplicates + report.rejected + report.key_duplicates + report.unfillable + report.rows_after
        );
    }

    #[test]
    fn should_be_deterministic() {
        let input = vec![
            raw("2024-01-01 16:00", "52 °F", "", "9 mph", "Cloudy."),
            raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny."),
            raw("2024-01-01 15:00", "", "61%", "No wind", ""),
        ];

        assert_eq!(clean(&input), clean(&input));
    }

    #[test]
    fn should_forward_fill_within_city() {
        let input = vec![
            raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny."),
            raw("2024-01-01 15:00", "", "61%", "N/A", ""),
            raw("2024-01-01 16:00", "52 °F", "", "9 mph", "Cloudy."),
        ];

        let (rows, report) = clean(&input);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].temperature_f, 50.0);
        assert_eq!(rows[1].wind_mph, 10.0);
        assert_eq!(rows[1].weather, "Sunny");
        assert_eq!(rows[1].filled, "temperature;wind;weather");
        assert_eq!(rows[2].humidity_pct, 61);
        assert_eq!(rows[2].filled, "humidity");

        assert_eq!(report.field(Field::Temperature).filled, 1);
        assert_eq!(report.field(Field::Temperature).present, 2);
        assert_eq!(report.field(Field::Humidity).filled, 1);
    }

    #[test]
    fn should_omit_rows_with_nothing_to_fill_from() {
        let mut other_city = raw("2024-01-01 15:00", "", "60%", "5 mph", "Rain.");
        other_city.city = "Boston, MA".to_string();
        let input = vec![
            raw("2024-01-01 13:00", "", "60%", "10 mph", "Sunny."),
            raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny."),
            other_city,
        ];

        let (rows, report) = clean(&input);

        assert_eq!(report.unfillable, 2);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].time, "2024-01-01 14:00");
    }

    #[test]
    fn should_mark_unknown_condition_when_unfillable() {
        let (rows, report) = clean(&[raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "")]);

        assert_eq!(rows[0].weather, UNKNOWN_CONDITION);
        assert_eq!(rows[0].filled, "weather");
        assert_eq!(report.field(Field::Weather).filled, 1);
    }

    #[test]
    fn should_treat_out_of_range_as_missing() {
        let input = vec![
            raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny."),
            raw("2024-01-01 15:00", "180 °F", "140%", "-3 mph", "Sunny."),
        ];

        let (rows, report) = clean(&input);

        assert_eq!(rows[1].temperature_f, 50.0);
        assert_eq!(rows[1].humidity_pct, 60);
        assert_eq!(rows[1].wind_mph, 10.0);
        assert_eq!(report.field(Field::Temperature).out_of_range, 1);
        assert_eq!(report.field(Field::Humidity).out_of_range, 1);
        assert_eq!(report.field(Field::Wind).out_of_range, 1);
    }

    #[test]
    fn should_reject_rows_without_key() {
        let mut no_city = raw("2024-01-01 14:00", "50 °F", "60%", "10 mph", "Sunny.");
        no_city.city = "  ".to_string();
        let bad_time = raw("yesterday", "50 °F", "60%", "10 mph", "Sunny.");

        let (rows, report) = clean(&[no_city, bad_time]);

        assert!(rows.is_empty());
        assert_eq!(report.rejected, 2);
    }

    #[test]
    fn should_parse_temperatures() {
        assert_eq!(parse_temperature("50 °F"), Ok(50.0));
        assert_eq!(parse_temperature("50°F"), Ok(50.0));
        assert_eq!(parse_temperature("-4 F"), Ok(-4.0));
        assert_eq!(parse_temperature("10 °C"), Ok(50.0));
        assert_eq!(parse_temperature(""), Err(FieldError::Missing));
        assert_eq!(parse_temperature("nan"), Err(FieldError::Missing));
        assert!(matches!(parse_temperature("warm"), Err(FieldError::Unparseable(_))));
        assert!(matches!(parse_temperature("50 K"), Err(FieldError::Unparseable(_))));
        assert!(matches!(parse_temperature("150 °F"), Err(FieldError::OutOfRange { .. })));
    }

    #[test]
    fn should_parse_wind_speeds() {
        assert_eq!(parse_wind("10 mph"), Ok(10.0));
        assert_eq!(parse_wind("No wind"), Ok(0.0));
        assert_eq!(parse_wind("Calm"), Ok(0.0));
        assert!((parse_wind("16.0934 km/h").unwrap() - 10.0).abs() < 1e-9);
        assert!((parse_wind("10 m/s").unwrap() - 22.36936).abs() < 1e-6);
        assert!(matches!(parse_wind("fast"), Err(FieldError::Unparseable(_))));
    }

    #[test]
    fn should_parse_humidity_and_condition() {
        assert_eq!(parse_humidity("60%"), Ok(60));
        assert_eq!(parse_humidity("60 %"), Ok(60));
        assert_eq!(parse_humidity("100"), Ok(100));
        assert!(matches!(parse_humidity("101%"), Err(FieldError::OutOfRange { .. })));
        assert_eq!(parse_condition(" Partly cloudy. "), Ok("Partly cloudy".to_string()));
        assert_eq!(parse_condition("N/A"), Err(FieldError::Missing));
    }

    #[test]
    fn should_parse_timestamps() {
        let expected = NaiveDateTime::parse_from_str("2024-01-01 14:00", TIME_FORMAT).unwrap();

        assert_eq!(parse_timestamp("2024-01-01 14:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T14:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T14:00:00.000000"), Some(expected));
        assert_eq!(parse_timestamp("14:00"), None);
    }
}
