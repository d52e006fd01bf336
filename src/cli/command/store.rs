//! Load the clean file into SQLite and summarise what is stored.

use std::fs;

use anyhow::Result;
use rusqlite::Connection;

use crate::{
    cli::create_progress_bar,
    config::Config,
    db::{
        self,
        load::{load_readings, LoadReport},
        query::{self, QueryTable},
    },
    flatfile,
    reading::CleanReading,
};

use super::print_table;

pub fn store(config: &Config) -> Result<String> {
    let readings: Vec<CleanReading> = flatfile::read_stage_input(&config.clean_file(), "clean")?;
    let db_path = config.database_file();
    let mut conn = db::open_for_writing(&db_path)?;

    let pb = create_progress_bar(readings.len() as u64, "Storing readings".to_string())?;
    let report = load_readings(&mut conn, &readings, &pb)?;
    pb.finish_with_message("Readings stored");

    print_load_report(&report);
    print_summaries(&conn)?;

    let size = fs::metadata(&db_path)?.len();
    println!("\nDatabase size: {:.1} KB", size as f64 / 1024.0);

    let schema = db::table_schema(&conn)?;
    let header = vec!["column".to_string(), "type".to_string(), "not null".to_string()];
    let rows: Vec<Vec<String>> = schema
        .iter()
        .map(|c| {
            let not_null = if c.not_null { "yes" } else { "" };
            vec![c.name.clone(), c.kind.clone(), not_null.to_string()]
        })
        .collect();
    print_table("Table schema:", &header, &rows);

    Ok(db_path.to_string_lossy().to_string())
}

fn print_load_report(report: &LoadReport) {
    println!("Existing records:   {}", report.existing);
    println!("Inserted:           {}", report.inserted);
    println!("Duplicates skipped: {}", report.duplicates);
    println!("Total records:      {}", report.total);
}

fn print_summaries(conn: &Connection) -> Result<()> {
    show(
        "Latest records:",
        &query::run_table(conn, query::LATEST_RECORDS, [])?,
    );
    show(
        "Temperature statistics:",
        &query::temperature_table(&query::temperature_stats(conn)?),
    );
    show(
        "Humidity distribution:",
        &query::run_table(conn, query::HUMIDITY_DISTRIBUTION, [])?,
    );
    show("Wind statistics:", &query::run_table(conn, query::WIND_ANALYSIS, [])?);
    show("Records per date:", &query::run_table(conn, query::DATE_SUMMARY, [])?);

    Ok(())
}

fn show(title: &str, table: &QueryTable) {
    print_table(title, &table.columns, &table.text_rows());
}

// -- Tests -------------------------------------------------------------------
