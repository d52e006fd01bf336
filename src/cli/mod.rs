//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{command, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::DEFAULT_CONFIG_FILE, dashboard::DashboardFilter};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Configuration file; defaults apply when it doesn't exist
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory holding the CSV files, the database and the dashboard
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape hourly readings into the raw CSV file
    Scrape {},
    /// Validate and normalise the raw file into the clean CSV file
    Clean {},
    /// Load the clean file into the SQLite database
    Store {},
    /// Explore the database through an interactive menu
    Query {},
    /// Render the HTML dashboard
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Only show this date (YYYY-MM-DD); repeatable
    #[arg(long = "date")]
    pub dates: Vec<NaiveDate>,

    /// First date to show, inclusive
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date to show, inclusive
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Lowest temperature to show, °F
    #[arg(long, allow_hyphen_values = true)]
    pub min_temp: Option<f64>,

    /// Highest temperature to show, °F
    #[arg(long, allow_hyphen_values = true)]
    pub max_temp: Option<f64>,

    /// Only show this weather condition; repeatable
    #[arg(long = "condition")]
    pub conditions: Vec<String>,

    /// Page to write, defaults to `<data-dir>/dashboard/index.html`
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also write the filtered rows to a CSV file beside the page
    #[arg(long)]
    pub export: bool,

    /// Re-render whenever the database changes
    #[arg(long)]
    pub watch: bool,

    /// Seconds between database checks in watch mode
    #[arg(long, default_value_t = 5)]
    pub interval: u64,
}

impl DashboardArgs {
    pub fn filter(&self) -> DashboardFilter {
        DashboardFilter {
            dates: self.dates.clone(),
            from: self.from,
            to: self.to,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            conditions: self.conditions.clone(),
        }
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")?.progress_chars("##-");

    Ok(ProgressBar::new(size).with_message(message).with_style(style))
}

// -- Tests -------------------------------------------------------------------
