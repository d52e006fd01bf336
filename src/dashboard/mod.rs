//! Static HTML dashboard over the stored readings.
//!
//! The page is rebuilt from the database on every render and written in one
//! step, so a browser refresh always sees a complete report.

pub mod charts;
pub mod filter;
pub mod report;

use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

pub use filter::DashboardFilter;
pub use report::Metrics;

use crate::{
    db::{self, StoredReading},
    error::QueryError,
    flatfile,
};

pub const PAGE_FILE: &str = "index.html";

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub page: PathBuf,
    pub total: usize,
    pub shown: usize,
    pub metrics: Metrics,
}

/// Everything stored, or nothing when the database or table is missing.
pub fn load_readings(db_path: &Path) -> Result<Vec<StoredReading>> {
    let conn = match db::open_read_only(db_path) {
        Ok(conn) => conn,
        Err(QueryError::MissingDatabase(path)) => {
            info!("{} does not exist yet, rendering empty dashboard", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let readings = db::all_readings(&conn).context("Failed to read stored readings")?;
    Ok(readings)
}

/// Renders the dashboard page to `page` from the current database contents.
pub fn render(db_path: &Path, filter: &DashboardFilter, page: &Path) -> Result<Rendered> {
    let readings = load_readings(db_path)?;
    let shown = filter.apply(&readings);

    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let html = report::render_page(&shown, readings.len(), filter, &generated_at)?;
    flatfile::write_text(page, &html)?;

    Ok(Rendered {
        page: page.to_path_buf(),
        total: readings.len(),
        shown: shown.len(),
        metrics: Metrics::from_readings(&shown),
    })
}

/// Writes the filtered view to `path` as CSV and returns the row count.
pub fn export(db_path: &Path, filter: &DashboardFilter, path: &Path) -> Result<usize> {
    let readings = load_readings(db_path)?;
    let rows: Vec<Vec<String>> = filter.apply(&readings).iter().map(|r| r.to_record()).collect();
    let header: Vec<String> = StoredReading::COLUMNS.iter().map(|c| c.to_string()).collect();

    flatfile::write_table(path, &header, &rows)?;
    Ok(rows.len())
}

/// Modification time of the database file, `None` while it doesn't exist.
pub fn database_mtime(db_path: &Path) -> Option<SystemTime> {
    std::fs::metadata(db_path).and_then(|m| m.modified()).ok()
}

// -- Tests -------------------------------------------------------------------
