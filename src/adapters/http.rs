//! Client for the unofficial addresspollution.org API.

use crate::domain::extract::parse_pollutants;
use crate::domain::model::{Address, AddressResponse, AddressesResponse, PollutionLevels};
use crate::utils::error::{PrintoutError, Result};
use crate::utils::validation::validate_contact_email;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

pub const DEFAULT_API_BASE_URL: &str = "https://api.addresspollution.org/api/v2";
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spaces requests at least `interval` apart.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Blocks until the next request is allowed.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                tracing::debug!("Rate limited, waiting until next request slot");
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    user_agent: String,
    rate_limiter: RateLimiter,
}

impl ApiClient {
    /// `contact_email` goes into the User-Agent so the API operators can
    /// reach whoever runs the bot.
    pub fn new(
        contact_email: &str,
        project_url: &str,
        base_url: &str,
        request_interval: Duration,
    ) -> Result<Self> {
        validate_contact_email("contact_email", contact_email)?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent(contact_email, project_url),
            rate_limiter: RateLimiter::new(request_interval),
        })
    }

    /// Searches for addresses within a postcode.
    pub async fn addresses(&self, postcode: &str) -> Result<Vec<Address>> {
        let url = format!("{}/addresses", self.base_url);
        let response: AddressesResponse = self
            .get_json(&url, &[("postcode", postcode)])
            .await?;
        tracing::debug!("Postcode {} has {} addresses", postcode, response.data.len());
        Ok(response.data)
    }

    /// Raw pollution response for an address id returned by [`Self::addresses`].
    pub async fn address_pollution(&self, address_id: Uuid) -> Result<AddressResponse> {
        let url = format!("{}/addresses/{}", self.base_url, address_id);
        self.get_json(&url, &[]).await
    }

    pub async fn pollution_at_address(&self, address_id: Uuid) -> Result<PollutionLevels> {
        let response = self.address_pollution(address_id).await?;
        Ok(parse_pollutants(&response)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        self.rate_limiter.wait().await;

        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        if response.status() != StatusCode::OK {
            return Err(PrintoutError::ApiStatusError {
                url: response.url().to_string(),
                status: response.status().to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn user_agent(contact_email: &str, project_url: &str) -> String {
    let mut parts = vec!["bot", contact_email];
    if !project_url.is_empty() {
        parts.push(project_url);
    }
    parts.join(" | ")
}
