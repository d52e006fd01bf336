//! Interactive, read-only exploration of the stored readings.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::Local;
use inquire::{Confirm, InquireError, Select, Text};
use rusqlite::Connection;

use crate::{
    config::Config,
    db::{
        self,
        query::{self, QueryTable, EXTREMES},
    },
    error::QueryError,
    flatfile,
};

use super::{make_export_file_name, print_table};

const ALL_DATES: &str = "All dates (summary)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    AllRecords,
    TemperatureStats,
    HumidityDistribution,
    WindAnalysis,
    Conditions,
    ByDate,
    Extremes,
    CustomSql,
    ExportAll,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 10] = [
        MenuItem::AllRecords,
        MenuItem::TemperatureStats,
        MenuItem::HumidityDistribution,
        MenuItem::WindAnalysis,
        MenuItem::Conditions,
        MenuItem::ByDate,
        MenuItem::Extremes,
        MenuItem::CustomSql,
        MenuItem::ExportAll,
        MenuItem::Exit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::AllRecords => "1. View all records",
            MenuItem::TemperatureStats => "2. Temperature statistics",
            MenuItem::HumidityDistribution => "3. Humidity distribution",
            MenuItem::WindAnalysis => "4. Wind speed analysis",
            MenuItem::Conditions => "5. Weather conditions breakdown",
            MenuItem::ByDate => "6. Query by date",
            MenuItem::Extremes => "7. Extreme conditions",
            MenuItem::CustomSql => "8. Custom SQL query",
            MenuItem::ExportAll => "9. Export all data to CSV",
            MenuItem::Exit => "0. Exit",
        };
        f.write_str(label)
    }
}

pub fn query(config: &Config) -> Result<String> {
    let conn = db::open_read_only(&config.database_file())?;
    if !db::table_exists(&conn)? {
        println!("The weather table does not exist yet; nothing to query.");
    }

    loop {
        let choice = match Select::new("What would you like to see?", MenuItem::ALL.to_vec()).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let outcome = match choice {
            MenuItem::Exit => break,
            MenuItem::ByDate => by_date(&conn),
            MenuItem::CustomSql => custom_sql(&conn, &config.data_dir),
            MenuItem::ExportAll => export_all(&conn, &config.data_dir).map(|(path, count)| {
                println!("Exported {} records to {}", count, path.display());
            }),
            item => fixed_reports(&conn, item).map(|reports| {
                for (title, table) in reports {
                    show(&title, &table);
                }
            }),
        };

        // A failed item is reported and the menu continues.
        if let Err(e) = outcome {
            println!("Error: {}", e);
        }
    }

    Ok("Goodbye".to_string())
}

/// The reports behind the menu items that need no further input.
pub fn fixed_reports(conn: &Connection, item: MenuItem) -> Result<Vec<(String, QueryTable)>> {
    if !db::table_exists(conn)? {
        return Ok(vec![(item.to_string(), QueryTable::default())]);
    }

    let reports = match item {
        MenuItem::AllRecords => vec![(
            "All records (latest first)".to_string(),
            query::run_table(conn, query::ALL_RECORDS, [])?,
        )],
        MenuItem::TemperatureStats => vec![(
            "Temperature statistics".to_string(),
            query::temperature_table(&query::temperature_stats(conn)?),
        )],
        MenuItem::HumidityDistribution => vec![(
            "Humidity distribution".to_string(),
            query::run_table(conn, query::HUMIDITY_DISTRIBUTION, [])?,
        )],
        MenuItem::WindAnalysis => vec![(
            "Wind speed analysis".to_string(),
            query::run_table(conn, query::WIND_ANALYSIS, [])?,
        )],
        MenuItem::Conditions => vec![(
            "Weather conditions".to_string(),
            query::run_table(conn, query::CONDITIONS, [])?,
        )],
        MenuItem::Extremes => EXTREMES
            .iter()
            .map(|extreme| {
                let table = query::run_table(conn, &extreme.sql(), [])?;
                Ok((extreme.title.to_string(), table))
            })
            .collect::<Result<Vec<_>, QueryError>>()?,
        _ => Vec::new(),
    };

    Ok(reports)
}

fn by_date(conn: &Connection) -> Result<()> {
    if !db::table_exists(conn)? {
        println!("No dates stored yet.");
        return Ok(());
    }

    let mut options = vec![ALL_DATES.to_string()];
    options.extend(query::available_dates(conn)?);

    let choice = Select::new("Which date?", options).prompt()?;
    if choice == ALL_DATES {
        show("Per-date summary", &query::run_table(conn, query::DATE_SUMMARY, [])?);
    } else {
        show(
            &format!("Records for {}", choice),
            &query::run_table(conn, query::DATE_ROWS, [&choice])?,
        );
    }

    Ok(())
}

fn custom_sql(conn: &Connection, data_dir: &Path) -> Result<()> {
    let sql = Text::new("SQL (read-only):").prompt()?;
    if sql.trim().is_empty() {
        return Ok(());
    }

    let table = query::run_read_only(conn, &sql)?;
    show("Query result", &table);

    if !table.is_empty() && Confirm::new("Export the result to CSV?").with_default(false).prompt()? {
        let path = make_export_file_name(data_dir, "query_result", Local::now());
        flatfile::write_table(&path, &table.columns, &table.text_rows())?;
        println!("Exported {} rows to {}", table.len(), path.display());
    }

    Ok(())
}

/// Writes every stored row to `data/weather_export_YYYYMMDD_HHMMSS.csv`.
pub fn export_all(conn: &Connection, data_dir: &Path) -> Result<(PathBuf, usize)> {
    let table = if db::table_exists(conn)? {
        query::run_table(conn, query::EXPORT_ALL, [])?
    } else {
        QueryTable::default()
    };

    let path = make_export_file_name(data_dir, "weather_export", Local::now());
    flatfile::write_table(&path, &table.columns, &table.text_rows())?;

    Ok((path, table.len()))
}

fn show(title: &str, table: &QueryTable) {
    print_table(title, &table.columns, &table.text_rows());
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::fs;

    use indicatif::ProgressBar;
    use tempfile::TempDir;

    use super::*;
    use crate::db::{load::load_readings, load::test::reading, open_for_writing, open_read_only};

    fn seeded(dir: &TempDir) -> Connection {
        let path = dir.path().join("weather.db");
        let mut conn = open_for_writing(&path).unwrap();
        let readings = vec![reading("2024-01-01 14:00", 50.0), reading("2024-01-02 09:00", 41.0)];
        load_readings(&mut conn, &readings, &ProgressBar::hidden()).unwrap();
        drop(conn);

        open_read_only(&path).unwrap()
    }

    #[test]
    fn should_number_menu_items() {
        let labels: Vec<String> = MenuItem::ALL.iter().map(ToString::to_string).collect();

        assert!(labels[0].starts_with("1."));
        assert!(labels[8].starts_with("9."));
        assert_eq!(labels[9], "0. Exit");
    }

    #[test]
    fn should_run_fixed_reports() {
        let dir = TempDir::new().unwrap();
        let conn = seeded(&dir);

        let all = fixed_reports(&conn, MenuItem::AllRecords).unwrap();
        assert_eq!(all[0].1.len(), 2);

        let extremes = fixed_reports(&conn, MenuItem::Extremes).unwrap();
        assert_eq!(extremes.len(), 4);
        assert_eq!(extremes[0].0, "Hottest Recorded");
        assert_eq!(extremes[1].1.text_rows()[0][1], "2024-01-02 09:00");
    }

    #[test]
    fn should_treat_missing_table_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (x INTEGER)")
            .unwrap();
        let conn = open_read_only(&path).unwrap();

        let reports = fixed_reports(&conn, MenuItem::TemperatureStats).unwrap();

        assert!(reports[0].1.is_empty());
    }

    #[test]
    fn should_export_all_records() {
        let dir = TempDir::new().unwrap();
        let conn = seeded(&dir);

        let (path, count) = export_all(&conn, dir.path()).unwrap();

        assert_eq!(count, 2);
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("weather_export_"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("id,city,time,date,"));
        assert_eq!(contents.lines().count(), 3);
    }
}
