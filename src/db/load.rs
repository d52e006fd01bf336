//! Idempotent insertion of clean readings.

use anyhow::Result;
use indicatif::ProgressBar;
use rusqlite::{params, Connection};

use crate::reading::CleanReading;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub existing: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub total: usize,
}

/// Inserts readings whose `(city, time)` is not stored yet, in one transaction.
pub fn load_readings(conn: &mut Connection, readings: &[CleanReading], pb: &ProgressBar) -> Result<LoadReport> {
    let existing = super::record_count(conn)?;
    let mut inserted = 0;
    let mut duplicates = 0;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            r#"
                INSERT OR IGNORE INTO weather
                    (city, time, date, temperature_f, temperature_c, weather,
                     wind_mph, wind_kmh, humidity_pct, scraped_at, filled)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )?;

        for r in readings {
            let changed = stmt.execute(params![
                &r.city,
                &r.time,
                &r.date,
                r.temperature_f,
                r.temperature_c,
                &r.weather,
                r.wind_mph,
                r.wind_kmh,
                r.humidity_pct,
                &r.scraped_at,
                &r.filled,
            ])?;

            if changed > 0 {
                inserted += 1;
            } else {
                duplicates += 1;
            }
            pb.inc(1);
        }
    }
    tx.commit()?;

    Ok(LoadReport {
        existing,
        inserted,
        duplicates,
        total: super::record_count(conn)?,
    })
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test {
    use tempfile::TempDir;

    use super::*;
    use crate::db::open_for_writing;

    pub(crate) fn reading(time: &str, temperature_f: f64) -> CleanReading {
        CleanReading {
            city: "Washington, DC".to_string(),
            time: time.to_string(),
            date: time[..10].to_string(),
            temperature_f,
            temperature_c: (temperature_f - 32.0) * 5.0 / 9.0,
            weather: "Sunny".to_string(),
            wind_mph: 10.0,
            wind_kmh: 16.09,
            humidity_pct: 60,
            scraped_at: "2024-01-01T12:00:00".to_string(),
            filled: String::new(),
        }
    }

    #[test]
    fn should_insert_new_readings() {
        let dir = TempDir::new().unwrap();
        let mut conn = open_for_writing(&dir.path().join("weather.db")).unwrap();
        let readings = vec![reading("2024-01-01 14:00", 50.0), reading("2024-01-01 15:00", 52.0)];

        let report = load_readings(&mut conn, &readings, &ProgressBar::hidden()).unwrap();

        assert_eq!(
            report,
            LoadReport {
                existing: 0,
                inserted: 2,
                duplicates: 0,
                total: 2
            }
        );
    }

    #[test]
    fn should_be_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.db");
        let readings = vec![reading("2024-01-01 14:00", 50.0), reading("2024-01-01 15:00", 52.0)];

        let mut conn = open_for_writing(&path).unwrap();
        load_readings(&mut conn, &readings, &ProgressBar::hidden()).unwrap();
        drop(conn);

        let mut conn = open_for_writing(&path).unwrap();
        let report = load_readings(&mut conn, &readings, &ProgressBar::hidden()).unwrap();

        assert_eq!(report.existing, 2);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn should_insert_only_unseen_keys() {
        let dir = TempDir::new().unwrap();
        let mut conn = open_for_writing(&dir.path().join("weather.db")).unwrap();
        load_readings(&mut conn, &[reading("2024-01-01 14:00", 50.0)], &ProgressBar::hidden()).unwrap();

        let mut other_city = reading("2024-01-01 14:00", 40.0);
        other_city.city = "Boston, MA".to_string();
        let batch = vec![reading("2024-01-01 14:00", 99.0), reading("2024-01-01 15:00", 52.0), other_city];

        let report = load_readings(&mut conn, &batch, &ProgressBar::hidden()).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.total, 3);

        let stored: f64 = conn
            .query_row(
                "SELECT temperature_f FROM weather WHERE city = 'Washington, DC' AND time = '2024-01-01 14:00'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, 50.0);
    }
}
