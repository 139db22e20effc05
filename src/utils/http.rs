// src/utils/http.rs

//! HTTP client utilities and the listing page fetcher.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;
use crate::models::ListingConfig;

/// Anything that can produce the raw listing markup.
pub trait PageSource {
    /// Fetch the listing page body.
    fn fetch(&self) -> Result<String>;

    /// URL the markup came from, used for the link in notifications.
    fn url(&self) -> &str;
}

/// Create a configured blocking HTTP client.
pub fn create_client(config: &ListingConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page body, treating non-2xx statuses as errors.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.text()?)
}

/// Fetches the configured listing page with a single GET.
pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(config: &ListingConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            url: config.url.clone(),
        })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self) -> Result<String> {
        log::info!("Fetching listing page {}", self.url);
        let body = fetch_text(&self.client, &self.url)?;
        log::debug!("Received {} bytes", body.len());
        Ok(body)
    }

    fn url(&self) -> &str {
        &self.url
    }
}
