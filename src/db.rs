//! The `weather` table in SQLite.
//!
//! The loader is the only writer. The query tool and the dashboard open the
//! database read-only and treat a missing table as an empty one.

pub mod load;
pub mod query;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};

use crate::error::QueryError;

pub const TABLE: &str = "weather";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS weather (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        city TEXT NOT NULL,
        time TEXT NOT NULL,
        date TEXT NOT NULL,
        temperature_f REAL,
        temperature_c REAL,
        weather TEXT,
        wind_mph REAL,
        wind_kmh REAL,
        humidity_pct INTEGER,
        scraped_at TEXT,
        filled TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(city, time)
    );
    CREATE INDEX IF NOT EXISTS idx_weather_date ON weather(date);
    CREATE INDEX IF NOT EXISTS idx_weather_city ON weather(city);
    CREATE INDEX IF NOT EXISTS idx_weather_temperature ON weather(temperature_f);
";

/// Opens (creating if needed) the database and makes sure the table and
/// indexes exist.
pub fn open_for_writing(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    conn.execute_batch(SCHEMA)?;

    Ok(conn)
}

/// Opens an existing database without write access.
pub fn open_read_only(db_path: &Path) -> Result<Connection, QueryError> {
    if !db_path.exists() {
        return Err(QueryError::MissingDatabase(db_path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    Ok(conn)
}

pub fn table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [TABLE],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

/// Number of stored readings; zero when the table doesn't exist yet.
pub fn record_count(conn: &Connection) -> rusqlite::Result<usize> {
    if !table_exists(conn)? {
        return Ok(0);
    }
    conn.query_row("SELECT COUNT(*) FROM weather", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub name: String,
    pub kind: String,
    pub not_null: bool,
}

pub fn table_schema(conn: &Connection) -> rusqlite::Result<Vec<TableColumn>> {
    let mut stmt = conn.prepare("PRAGMA table_info(weather)")?;
    let columns = stmt
        .query_map([], |row| {
            Ok(TableColumn {
                name: row.get(1)?,
                kind: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
            })
        })?
        .collect();

    columns
}

/// A stored reading as the dashboard reads it back.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
    pub id: i64,
    pub city: String,
    pub time: String,
    pub date: String,
    pub temperature_f: Option<f64>,
    pub temperature_c: Option<f64>,
    pub weather: Option<String>,
    pub wind_mph: Option<f64>,
    pub wind_kmh: Option<f64>,
    pub humidity_pct: Option<i64>,
}

impl StoredReading {
    pub const COLUMNS: [&'static str; 10] = [
        "id",
        "city",
        "time",
        "date",
        "temperature_f",
        "temperature_c",
        "weather",
        "wind_mph",
        "wind_kmh",
        "humidity_pct",
    ];

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(StoredReading {
            id: row.get(0)?,
            city: row.get(1)?,
            time: row.get(2)?,
            date: row.get(3)?,
            temperature_f: row.get(4)?,
            temperature_c: row.get(5)?,
            weather: row.get(6)?,
            wind_mph: row.get(7)?,
            wind_kmh: row.get(8)?,
            humidity_pct: row.get(9)?,
        })
    }

    pub fn to_record(&self) -> Vec<String> {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        vec![
            self.id.to_string(),
            self.city.clone(),
            self.time.clone(),
            self.date.clone(),
            opt(&self.temperature_f),
            opt(&self.temperature_c),
            opt(&self.weather),
            opt(&self.wind_mph),
            opt(&self.wind_kmh),
            opt(&self.humidity_pct),
        ]
    }
}

/// Every stored reading in time order; empty when the table doesn't exist.
pub fn all_readings(conn: &Connection) -> rusqlite::Result<Vec<StoredReading>> {
    if !table_exists(conn)? {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM weather ORDER BY city, time",
        StoredReading::COLUMNS.join(", ")
    ))?;
    let readings = stmt.query_map([], StoredReading::from_row)?.collect();

    readings
}

// -- Tests -------------------------------------------------------------------
