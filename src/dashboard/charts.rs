//! SVG charts for the dashboard, drawn with plotters into in-memory strings.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime};
use plotters::{data::Quartiles, element::Boxplot, prelude::*};

use super::report::mean;
use crate::{
    clean::{TIME_FORMAT, WIND_RANGE_MPH},
    db::StoredReading,
};

const SIZE: (u32, u32) = (720, 360);
const WIND_BIN_MPH: f64 = 5.0;

/// Temperature in °F and °C over time, one pair of lines per city.
pub fn temperature_line(readings: &[&StoredReading]) -> Result<String> {
    let mut series: BTreeMap<&str, Vec<(i64, f64, f64)>> = BTreeMap::new();
    for &r in readings {
        let (Some(minute), Some(f), Some(c)) = (minute_of(&r.time), r.temperature_f, r.temperature_c) else {
            continue;
        };
        series.entry(r.city.as_str()).or_default().push((minute, f, c));
    }
    for points in series.values_mut() {
        points.sort_by_key(|&(minute, _, _)| minute);
    }

    let (start, end) = series
        .values()
        .flatten()
        .fold((i64::MAX, i64::MIN), |(lo, hi), &(m, _, _)| (lo.min(m), hi.max(m)));
    let (start, end) = if start > end { (0, 60) } else { (start, end.max(start + 60)) };
    let (low, high) = padded_range(series.values().flatten().flat_map(|&(_, f, c)| [f, c]));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Temperature Over Time", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(start..end, low..high)?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("Temperature")
            .x_labels(6)
            .x_label_formatter(&|m: &i64| format_minute(*m))
            .light_line_style(BLACK.mix(0.15))
            .draw()?;

        for (i, (city, points)) in series.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            let faded = color.mix(0.5);
            chart
                .draw_series(LineSeries::new(points.iter().map(|&(m, f, _)| (m, f)), color.stroke_width(2)))?
                .label(format!("{} °F", city))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart
                .draw_series(LineSeries::new(points.iter().map(|&(m, _, c)| (m, c)), faded.stroke_width(2)))?
                .label(format!("{} °C", city))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], faded));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(svg)
}

/// Minutes since the epoch, so readings sit on a linear time axis.
fn minute_of(time: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(time, TIME_FORMAT)
        .ok()
        .map(|t| t.and_utc().timestamp() / 60)
}

fn format_minute(minute: i64) -> String {
    DateTime::from_timestamp(minute * 60, 0)
        .map(|t| t.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Readings grouped by condition, most frequent first.
fn by_condition<'a>(readings: &[&'a StoredReading]) -> Vec<(&'a str, Vec<&'a StoredReading>)> {
    let mut groups: BTreeMap<&'a str, Vec<&'a StoredReading>> = BTreeMap::new();
    for &r in readings {
        if let Some(weather) = r.weather.as_deref().filter(|w| !w.is_empty()) {
            groups.entry(weather).or_default().push(r);
        }
    }

    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
    groups
}

/// Occurrences of each weather condition, most frequent first.
pub fn condition_counts(readings: &[&StoredReading]) -> Result<String> {
    let bars: Vec<(String, u32)> = by_condition(readings)
        .into_iter()
        .map(|(condition, group)| (condition.to_string(), group.len() as u32))
        .collect();

    bar_chart("Weather Conditions", "Condition", &bars)
}

/// Occurrences of each condition as bars, with the condition's average
/// temperature as a line against a second axis.
pub fn condition_temperature(readings: &[&StoredReading]) -> Result<String> {
    let groups = by_condition(readings);
    let bars: Vec<(&str, u32)> = groups.iter().map(|(c, group)| (*c, group.len() as u32)).collect();
    let averages: Vec<(u32, f64)> = groups
        .iter()
        .enumerate()
        .filter_map(|(i, (_, group))| Some((i as u32, mean(group.iter().filter_map(|r| r.temperature_f))?)))
        .collect();

    let n = bars.len().max(1) as u32;
    let max = bars.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);
    let (low, high) = padded_range(averages.iter().map(|&(_, t)| t));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Conditions: Count & Avg Temperature", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .right_y_label_area_size(50)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..max + max / 10 + 1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Condition")
            .y_desc("Occurrences")
            .x_labels(bars.len() + 1)
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, |i| bars.get(i).map(|(c, _)| c.to_string())))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(GREEN.mix(0.5).filled())
                .margin(4)
                .data(bars.iter().enumerate().map(|(i, (_, count))| (i as u32, *count))),
        )?;

        let mut chart = chart.set_secondary_coord((0u32..n).into_segmented(), low..high);
        chart
            .configure_secondary_axes()
            .y_desc("Avg Temperature (°F)")
            .draw()?;

        chart.draw_secondary_series(LineSeries::new(
            averages.iter().map(|&(i, t)| (SegmentValue::CenterOf(i), t)),
            RED.stroke_width(2),
        ))?;
        chart.draw_secondary_series(
            averages
                .iter()
                .map(|&(i, t)| Circle::new((SegmentValue::CenterOf(i), t), 4, RED.filled())),
        )?;

        root.present()?;
    }

    Ok(svg)
}

/// Spread of wind speeds under each condition.
pub fn wind_by_condition(readings: &[&StoredReading]) -> Result<String> {
    let boxes: Vec<(&str, Quartiles)> = by_condition(readings)
        .into_iter()
        .filter_map(|(condition, group)| {
            let speeds: Vec<f64> = group.iter().filter_map(|r| r.wind_mph).collect();
            (!speeds.is_empty()).then(|| (condition, Quartiles::new(&speeds)))
        })
        .collect();

    let n = boxes.len().max(1) as u32;
    let (low, high) = padded_range(boxes.iter().flat_map(|(_, q)| q.values()).map(f64::from));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Wind Speed by Condition", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d((0u32..n).into_segmented(), low as f32..high as f32)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Condition")
            .y_desc("Wind (mph)")
            .x_labels(boxes.len() + 1)
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, |i| boxes.get(i).map(|(c, _)| c.to_string())))
            .light_line_style(BLACK.mix(0.15))
            .draw()?;

        chart.draw_series(boxes.iter().enumerate().map(|(i, (_, quartiles))| {
            Boxplot::new_vertical(SegmentValue::CenterOf(i as u32), quartiles)
                .width(20)
                .whisker_width(0.5)
                .style(BLUE)
        }))?;

        root.present()?;
    }

    Ok(svg)
}

/// Wind speeds bucketed into fixed-width mph bins.
pub fn wind_histogram(readings: &[&StoredReading]) -> Result<String> {
    let speeds: Vec<f64> = readings.iter().filter_map(|r| r.wind_mph).collect();
    bar_chart("Wind Speed Distribution", "Wind (mph)", &wind_bins(&speeds))
}

/// Speeds beyond the plausible range land in the last bin.
fn wind_bins(speeds: &[f64]) -> Vec<(String, u32)> {
    let top = speeds.iter().cloned().fold(0.0, f64::max).min(WIND_RANGE_MPH.1);
    let bins = (top / WIND_BIN_MPH).floor() as usize + 1;

    let mut counts = vec![0u32; bins];
    for speed in speeds {
        let bin = ((speed / WIND_BIN_MPH).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| {
            let start = i as f64 * WIND_BIN_MPH;
            (format!("{}-{}", start, start + WIND_BIN_MPH), n)
        })
        .collect()
}

/// Humidity against temperature, one point per reading.
pub fn humidity_scatter(readings: &[&StoredReading]) -> Result<String> {
    let points: Vec<(f64, f64)> = readings
        .iter()
        .filter_map(|r| Some((r.temperature_f?, r.humidity_pct? as f64)))
        .collect();
    let (low, high) = padded_range(points.iter().map(|&(t, _)| t));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Humidity vs Temperature", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(low..high, 0.0..100.0)?;

        chart
            .configure_mesh()
            .x_desc("Temperature (°F)")
            .y_desc("Humidity (%)")
            .light_line_style(BLACK.mix(0.15))
            .draw()?;

        chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, BLUE.mix(0.6).filled())))?;

        root.present()?;
    }

    Ok(svg)
}

fn segment_label(value: &SegmentValue<u32>, label: impl Fn(usize) -> Option<String>) -> String {
    match value {
        SegmentValue::CenterOf(i) => label(*i as usize).unwrap_or_default(),
        _ => String::new(),
    }
}

fn bar_chart(title: &str, x_desc: &str, bars: &[(String, u32)]) -> Result<String> {
    let n = bars.len().max(1) as u32;
    let max = bars.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..max + max / 10 + 1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc("Count")
            .x_labels(bars.len() + 1)
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, |i| bars.get(i).map(|(l, _)| l.clone())))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.6).filled())
                .margin(4)
                .data(bars.iter().enumerate().map(|(i, (_, count))| (i as u32, *count))),
        )?;

        root.present()?;
    }

    Ok(svg)
}

/// Axis bounds around `values` with a tenth of the spread as padding.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    if !min.is_finite() {
        return (0.0, 1.0);
    }

    let padding = if (max - min).abs() > 1e-6 { (max - min) * 0.1 } else { 1.0 };
    (min - padding, max + padding)
}

// -- Tests -------------------------------------------------------------------
