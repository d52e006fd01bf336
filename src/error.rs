//! Typed failures that callers need to tell apart.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a scrape before the raw file is touched.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to reach {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("hourly table did not appear on {url} within {waited_secs}s")]
    Timeout { url: String, waited_secs: u64 },
}

/// Row-level problems found while validating a single raw field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("missing value")]
    Missing,

    #[error("cannot parse `{0}`")]
    Unparseable(String),

    #[error("{value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("only read-only statements are allowed")]
    NotReadOnly,

    #[error("database not found at {}; run `weather store` first", .0.display())]
    MissingDatabase(PathBuf),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// A stage input that an earlier stage has not produced yet.
#[derive(Debug, Error)]
#[error("{} not found; run `weather {producer}` first", path.display())]
pub struct MissingInput {
    pub path: PathBuf,
    pub producer: &'static str,
}
