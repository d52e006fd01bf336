use std::fmt::Write;

use anyhow::Result;

use super::{charts, filter::DashboardFilter};
use crate::db::StoredReading;

/// Headline averages over the shown readings. Averages skip missing values and
/// are `None` when nothing is left to average.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub count: usize,
    pub avg_temp_f: Option<f64>,
    pub avg_temp_c: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub avg_wind_mph: Option<f64>,
    pub avg_wind_kmh: Option<f64>,
}

impl Metrics {
    pub fn from_readings(readings: &[&StoredReading]) -> Self {
        Metrics {
            count: readings.len(),
            avg_temp_f: mean(readings.iter().filter_map(|r| r.temperature_f)),
            avg_temp_c: mean(readings.iter().filter_map(|r| r.temperature_c)),
            avg_humidity: mean(readings.iter().filter_map(|r| r.humidity_pct.map(|h| h as f64))),
            avg_wind_mph: mean(readings.iter().filter_map(|r| r.wind_mph)),
            avg_wind_kmh: mean(readings.iter().filter_map(|r| r.wind_kmh)),
        }
    }
}

pub(super) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Builds the dashboard page for the shown readings; `total` is the number of
/// stored readings before filtering.
pub fn render_page(
    readings: &[&StoredReading],
    total: usize,
    filter: &DashboardFilter,
    generated_at: &str,
) -> Result<String> {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>Weather Dashboard</title>")?;
    writeln!(html, "<style>{}</style>\n</head>\n<body>", STYLE)?;
    writeln!(html, "<h1>Weather Dashboard</h1>")?;
    writeln!(html, "<p class=\"generated\">Generated {}</p>", escape(generated_at))?;

    if !filter.is_empty() {
        writeln!(html, "<ul class=\"filters\">")?;
        for line in filter.describe() {
            writeln!(html, "<li>{}</li>", escape(&line))?;
        }
        writeln!(html, "</ul>")?;
    }

    if readings.is_empty() {
        let message = if total == 0 {
            "No weather data stored yet. Run <code>weather scrape</code>, <code>weather clean</code> and <code>weather store</code> first."
        } else {
            "No readings match the current filters."
        };
        writeln!(html, "<div class=\"empty\">{}</div>", message)?;
        writeln!(html, "</body>\n</html>")?;
        return Ok(html);
    }

    let metrics = Metrics::from_readings(readings);
    writeln!(html, "<section class=\"metrics\">")?;
    metric(&mut html, "Avg Temperature", &pair(metrics.avg_temp_f, "°F", metrics.avg_temp_c, "°C"))?;
    metric(&mut html, "Avg Humidity", &single(metrics.avg_humidity, "%"))?;
    metric(&mut html, "Avg Wind", &pair(metrics.avg_wind_mph, "mph", metrics.avg_wind_kmh, "km/h"))?;
    metric(&mut html, "Records", &format!("{} of {}", metrics.count, total))?;
    writeln!(html, "</section>")?;

    writeln!(html, "<section class=\"charts\">")?;
    for svg in [
        charts::temperature_line(readings)?,
        charts::condition_counts(readings)?,
        charts::condition_temperature(readings)?,
        charts::humidity_scatter(readings)?,
        charts::wind_histogram(readings)?,
        charts::wind_by_condition(readings)?,
    ] {
        writeln!(html, "<figure>{}</figure>", svg)?;
    }
    writeln!(html, "</section>")?;

    writeln!(html, "<h2>Data</h2>\n<table>\n<thead><tr>")?;
    for column in StoredReading::COLUMNS {
        write!(html, "<th>{}</th>", column)?;
    }
    writeln!(html, "</tr></thead>\n<tbody>")?;
    for reading in readings {
        write!(html, "<tr>")?;
        for cell in reading.to_record() {
            write!(html, "<td>{}</td>", escape(&cell))?;
        }
        writeln!(html, "</tr>")?;
    }
    writeln!(html, "</tbody>\n</table>")?;
    writeln!(html, "</body>\n</html>")?;

    Ok(html)
}

fn metric(html: &mut String, label: &str, value: &str) -> std::fmt::Result {
    writeln!(
        html,
        "<div class=\"metric\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>",
        label, value
    )
}

fn single(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, unit),
        None => "n/a".to_string(),
    }
}

fn pair(first: Option<f64>, first_unit: &str, second: Option<f64>, second_unit: &str) -> String {
    match (first, second) {
        (Some(a), Some(b)) => format!("{:.1} {} / {:.1} {}", a, first_unit, b, second_unit),
        _ => "n/a".to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em; color: #222; }
.generated { color: #777; }
.metrics { display: flex; gap: 1em; margin: 1em 0; }
.metric { border: 1px solid #ddd; border-radius: 4px; padding: 0.8em 1.2em; }
.metric .label { display: block; font-size: 0.85em; color: #666; }
.metric .value { font-size: 1.4em; }
.charts { display: flex; flex-wrap: wrap; }
figure { margin: 0.5em; }
.empty { padding: 2em; background: #f6f6f6; border-radius: 4px; }
table { border-collapse: collapse; font-size: 0.9em; }
th, td { border: 1px solid #ddd; padding: 0.3em 0.6em; text-align: left; }
";

// -- Tests -------------------------------------------------------------------
