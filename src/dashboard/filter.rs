use chrono::NaiveDate;

use crate::db::StoredReading;

/// Narrows the stored readings shown on the dashboard. Empty criteria match
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilter {
    pub dates: Vec<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub conditions: Vec<String>,
}

impl DashboardFilter {
    pub fn is_empty(&self) -> bool {
        *self == DashboardFilter::default()
    }

    pub fn matches(&self, reading: &StoredReading) -> bool {
        self.matches_date(&reading.date)
            && self.matches_temperature(reading.temperature_f)
            && self.matches_condition(reading.weather.as_deref())
    }

    pub fn apply<'a>(&self, readings: &'a [StoredReading]) -> Vec<&'a StoredReading> {
        readings.iter().filter(|r| self.matches(r)).collect()
    }

    /// One line per active criterion, for the report header.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.dates.is_empty() {
            let dates: Vec<String> = self.dates.iter().map(NaiveDate::to_string).collect();
            lines.push(format!("Dates: {}", dates.join(", ")));
        }
        match (self.from, self.to) {
            (Some(from), Some(to)) => lines.push(format!("Date range: {} to {}", from, to)),
            (Some(from), None) => lines.push(format!("From: {}", from)),
            (None, Some(to)) => lines.push(format!("To: {}", to)),
            (None, None) => {}
        }
        if let Some(min) = self.min_temp {
            lines.push(format!("Min temperature: {} °F", min));
        }
        if let Some(max) = self.max_temp {
            lines.push(format!("Max temperature: {} °F", max));
        }
        if !self.conditions.is_empty() {
            lines.push(format!("Conditions: {}", self.conditions.join(", ")));
        }
        lines
    }

    fn matches_date(&self, date: &str) -> bool {
        if self.dates.is_empty() && self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            return false;
        };

        (self.dates.is_empty() || self.dates.contains(&date))
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }

    fn matches_temperature(&self, temperature_f: Option<f64>) -> bool {
        if self.min_temp.is_none() && self.max_temp.is_none() {
            return true;
        }
        let Some(t) = temperature_f else {
            return false;
        };

        self.min_temp.map_or(true, |min| t >= min) && self.max_temp.map_or(true, |max| t <= max)
    }

    fn matches_condition(&self, weather: Option<&str>) -> bool {
        self.conditions.is_empty() || weather.is_some_and(|w| self.conditions.iter().any(|c| c == w))
    }
}

// -- Tests -------------------------------------------------------------------
