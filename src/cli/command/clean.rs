use anyhow::Result;
use log::info;

use crate::{
    clean::clean as clean_readings,
    config::Config,
    flatfile,
    reading::RawReading,
};

pub fn clean(config: &Config) -> Result<String> {
    let (raw, unreadable): (Vec<RawReading>, usize) =
        flatfile::read_stage_input_skipping_bad(&config.raw_file(), "scrape")?;
    info!("Read {} raw rows ({} unreadable)", raw.len(), unreadable);

    let (readings, mut report) = clean_readings(&raw);
    report.rows_before += unreadable;
    report.rejected += unreadable;
    println!("{}", report);

    let clean_path = config.clean_file();
    flatfile::write_records(&clean_path, &readings)?;

    Ok(clean_path.to_string_lossy().to_string())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::reading::CleanReading;

    fn config(dir: &TempDir) -> Config {
        Config::default().with_data_dir(Some(dir.path().to_path_buf()))
    }

    #[test]
    fn should_require_raw_file() {
        let dir = TempDir::new().unwrap();

        let err = clean(&config(&dir)).unwrap_err();

        assert!(err.to_string().contains("run `weather scrape` first"));
    }

    #[test]
    fn should_write_clean_file() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::write(
            config.raw_file(),
            "City,Time,Temperature,Weather,Wind,Humidity,Scraped_At\n\
             \"Washington, DC\",2024-01-01 14:00,50 °F,Sunny.,10 mph,60%,2024-01-01T13:00:00\n\
             \"Washington, DC\",2024-01-01 14:00,50 °F,Sunny.,10 mph,60%,2024-01-01T13:00:00\n",
        )
        .unwrap();

        clean(&config).unwrap();

        let readings: Vec<CleanReading> = flatfile::read_records(&config.clean_file()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].temperature_c, 10.0);
        assert_eq!(readings[0].wind_kmh, 16.09);
        assert_eq!(readings[0].weather, "Sunny");
    }

    #[test]
    fn should_skip_unreadable_raw_rows() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let mut contents = "City,Time,Temperature,Weather,Wind,Humidity,Scraped_At\n\
             \"Washington, DC\",2024-01-01 14:00,50 °F,Sunny.,10 mph,60%,2024-01-01T13:00:00\n"
            .as_bytes()
            .to_vec();
        contents.extend_from_slice(b"\"Washington, DC\",2024-01-01 15:00,5\xff\xfe F,Sunny.,10 mph,60%,\n");
        fs::write(config.raw_file(), contents).unwrap();

        clean(&config).unwrap();

        let readings: Vec<CleanReading> = flatfile::read_records(&config.clean_file()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].time, "2024-01-01 14:00");
    }
}
