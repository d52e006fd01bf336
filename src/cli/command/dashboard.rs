//! Render the dashboard, once or whenever the database changes.

use std::{path::Path, time::Duration};

use anyhow::Result;
use chrono::Local;
use log::{debug, info, warn};

use crate::{
    cli::DashboardArgs,
    config::Config,
    dashboard::{self, DashboardFilter, Rendered, PAGE_FILE},
};

use super::make_export_file_name;

pub async fn dashboard(config: &Config, args: &DashboardArgs) -> Result<String> {
    let filter = args.filter();
    let page = args
        .output
        .clone()
        .unwrap_or_else(|| config.dashboard_dir().join(PAGE_FILE));
    let db_path = config.database_file();

    render_once(config, &db_path, &filter, &page, args.export)?;

    if args.watch {
        println!("Watching {} (Ctrl-C to stop)", db_path.display());
        let interval = Duration::from_secs(args.interval.max(1));
        let mut last_seen = dashboard::database_mtime(&db_path);

        loop {
            tokio::time::sleep(interval).await;

            let mtime = dashboard::database_mtime(&db_path);
            if mtime == last_seen {
                debug!("{} unchanged", db_path.display());
                continue;
            }

            info!("{} changed, re-rendering", db_path.display());
            last_seen = mtime;
            if let Err(e) = render_once(config, &db_path, &filter, &page, args.export) {
                warn!("Failed to re-render dashboard: {:#}", e);
            }
        }
    }

    Ok(page.to_string_lossy().to_string())
}

fn render_once(
    config: &Config,
    db_path: &Path,
    filter: &DashboardFilter,
    page: &Path,
    export: bool,
) -> Result<Rendered> {
    let rendered = dashboard::render(db_path, filter, page)?;
    println!(
        "[{}] Dashboard rendered: {} of {} records shown",
        Local::now().format("%H:%M:%S"),
        rendered.shown,
        rendered.total
    );

    if export {
        let path = make_export_file_name(&config.dashboard_dir(), "weather_filtered", Local::now());
        let count = dashboard::export(db_path, filter, &path)?;
        println!("Exported {} filtered records to {}", count, path.display());
    }

    Ok(rendered)
}

// -- Tests -------------------------------------------------------------------
