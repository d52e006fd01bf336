//! Reading and writing the pipeline's CSV files.
//!
//! Writes go to a temporary file beside the target and are renamed into place,
//! so a failed run never leaves a half-written file behind.

use std::{
    fs,
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::MissingInput;

/// Reads every record of a headed CSV file.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        // idx + 2: one for the header, one for 1-based line numbers
        let record = result.with_context(|| format!("{}: bad record on line {}", path.display(), idx + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// Reads the records that deserialize and counts the ones that don't. Only a
/// failure to read the file itself is an error.
pub fn read_readable_records<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for result in reader.deserialize() {
        match result {
            Ok(record) => records.push(record),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
            Err(e) => {
                warn!("{}: skipping unreadable record: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    Ok((records, skipped))
}

/// Like [`read_records`], but reports a missing file as a [`MissingInput`]
/// naming the command that produces it.
pub fn read_stage_input<T: DeserializeOwned>(path: &Path, producer: &'static str) -> Result<Vec<T>> {
    require_stage_input(path, producer)?;
    read_records(path)
}

/// [`read_readable_records`] for a stage input.
pub fn read_stage_input_skipping_bad<T: DeserializeOwned>(
    path: &Path,
    producer: &'static str,
) -> Result<(Vec<T>, usize)> {
    require_stage_input(path, producer)?;
    read_readable_records(path)
}

fn require_stage_input(path: &Path, producer: &'static str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    Err(MissingInput {
        path: path.to_path_buf(),
        producer,
    }
    .into())
}

/// Reads records if the file exists, otherwise returns none.
pub fn read_records_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if path.exists() {
        read_records(path)
    } else {
        Ok(Vec::new())
    }
}

/// Replaces `path` with the serialised records.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    write_atomically(path, |file| {
        let mut writer = csv::Writer::from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    })
}

/// Writes a header row plus string rows, for tables whose shape is only known
/// at run time.
pub fn write_table(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    write_atomically(path, |file| {
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    })
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    write_atomically(path, |file| {
        file.write_all(contents.as_bytes())?;
        Ok(())
    })
}

fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(&mut tmp)?;
    tmp.as_file_mut().flush()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;
    use crate::reading::RawReading;

    #[test]
    fn should_write_and_read_raw_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/raw_weather.csv");
        let rows = vec![RawReading {
            city: "Washington, DC".to_string(),
            time: "2024-01-01 14:00".to_string(),
            temperature: "50 °F".to_string(),
            weather: "Sunny.".to_string(),
            wind: "10 mph".to_string(),
            humidity: "60%".to_string(),
            scraped_at: "2024-01-01T13:05:00".to_string(),
        }];

        write_records(&path, &rows).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("City,Time,Temperature,Weather,Wind,Humidity,Scraped_At"));
        assert_eq!(read_records::<RawReading>(&path).unwrap(), rows);
    }

    #[test]
    fn should_tolerate_blank_and_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw_weather.csv");
        fs::write(
            &path,
            "City,Time,Temperature,Weather,Wind,Humidity,Scraped_At\n\
             \"Washington, DC\",2024-01-01 14:00,,Sunny.,,60%,\n",
        )
        .unwrap();

        let rows: Vec<RawReading> = read_records(&path).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temperature, "");
        assert_eq!(rows[0].humidity, "60%");
    }

    #[test]
    fn should_skip_unreadable_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw_weather.csv");
        let mut contents = b"City,Time,Temperature,Weather,Wind,Humidity,Scraped_At\n\
            \"Washington, DC\",2024-01-01 14:00,50 \xc2\xb0F,Sunny.,10 mph,60%,\n"
            .to_vec();
        contents.extend_from_slice(b"\"Washington, DC\",2024-01-01 15:00,5\xff\xfe F,Sunny.,10 mph,60%,\n");
        fs::write(&path, contents).unwrap();

        assert!(read_records::<RawReading>(&path).is_err());

        let (rows, skipped) = read_readable_records::<RawReading>(&path).unwrap();

        assert_eq!(skipped, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temperature, "50 °F");
    }

    #[test]
    fn should_report_missing_stage_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clean_weather.csv");

        let err = read_stage_input::<RawReading>(&path, "clean").unwrap_err();

        assert!(err.to_string().contains("run `weather clean` first"));
        assert!(read_stage_input_skipping_bad::<RawReading>(&path, "clean").is_err());
        assert!(read_records_if_exists::<RawReading>(&path).unwrap().is_empty());
    }

    #[test]
    fn should_write_dynamic_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        let header = vec!["city".to_string(), "avg".to_string()];
        let rows = vec![vec!["Washington, DC".to_string(), "50.5".to_string()]];

        write_table(&path, &header, &rows).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "city,avg\n\"Washington, DC\",50.5\n");
    }
}
