//! Fetches the forecast page, waiting for its content to materialize.

use std::time::{Duration, Instant};

use anyhow::Result;
use log::debug;
use reqwest::Client;

use crate::error::ScrapeError;

/// How long to keep asking for a page whose content isn't there yet.
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    pub timeout: Duration,
    pub poll: Duration,
}

/// Builds a client that identifies itself with `user_agent`.
pub fn build_client(user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .build()?;

    Ok(client)
}

/// Fetches `url` until `is_ready` accepts the body or `wait.timeout` elapses.
pub async fn fetch_when_ready<F>(
    client: &Client,
    url: &str,
    wait: Wait,
    is_ready: F,
) -> Result<String, ScrapeError>
where
    F: Fn(&str) -> bool,
{
    let started = Instant::now();
    let mut attempt = 1;

    loop {
        let body = fetch_page(client, url).await?;
        if is_ready(&body) {
            debug!("{} ready after {} attempt(s)", url, attempt);
            return Ok(body);
        }

        if started.elapsed() + wait.poll > wait.timeout {
            return Err(ScrapeError::Timeout {
                url: url.to_string(),
                waited_secs: wait.timeout.as_secs(),
            });
        }

        debug!("{} not ready on attempt {}, retrying", url, attempt);
        attempt += 1;
        tokio::time::sleep(wait.poll).await;
    }
}

async fn fetch_page(client: &Client, url: &str) -> Result<String, ScrapeError> {
    let navigation = |source| ScrapeError::Navigation {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(navigation)?;

    if !response.status().is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.text().await.map_err(navigation)
}

// -- Tests -------------------------------------------------------------------
