mod clean;
mod cli;
mod config;
mod dashboard;
mod db;
mod download;
mod error;
mod extract;
mod flatfile;
mod reading;
mod table;

use std::process::ExitCode;

use clap::Parser;
use cli::{command, Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config.with_data_dir(cli.data_dir.clone()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.command {
        Commands::Scrape {} => command::scrape(&config)
            .await
            .map(|path| format!("Raw data saved to `{}`", path)),
        Commands::Clean {} => command::clean(&config).map(|path| format!("Clean data saved to `{}`", path)),
        Commands::Store {} => command::store(&config).map(|path| format!("Database saved to `{}`", path)),
        Commands::Query {} => command::query(&config),
        Commands::Dashboard(args) => command::dashboard(&config, args)
            .await
            .map(|path| format!("Dashboard saved to `{}`", path)),
    };

    match result {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
