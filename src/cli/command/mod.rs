pub mod clean;
pub mod dashboard;
pub mod query;
pub mod scrape;
pub mod store;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
pub use clean::clean;
pub use dashboard::dashboard;
pub use query::query;
pub use scrape::scrape;
pub use store::store;

use crate::table;

/// `<dir>/<prefix>_YYYYMMDD_HHMMSS.csv` for the given moment.
pub fn make_export_file_name(dir: &Path, prefix: &str, at: DateTime<Local>) -> PathBuf {
    let file_name = format!("{}_{}.csv", prefix, at.format("%Y%m%d_%H%M%S"));

    dir.join(file_name)
}

/// Prints a headed table to stdout, or a note when it has no rows.
pub fn print_table(title: &str, header: &[String], rows: &[Vec<String>]) {
    println!("\n{}", title);
    if rows.is_empty() {
        println!("(no rows)");
    } else {
        print!("{}", table::render(header, rows));
    }
}

// -- Tests -------------------------------------------------------------------
