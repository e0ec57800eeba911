//! Record sources: where raw researchmap JSON comes from.
//!
//! [`ResearchmapClient`] talks to the live API, strictly one call at a time
//! with a pause after each call. [`StaticSource`] serves records already in
//! memory (JSON dumps, tests).

use crate::config::SourceConfig;
use crate::error::{NenpoError, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Anything that can deliver researchmap endpoint responses.
pub trait RecordSource {
    /// Fetch one endpoint (`profile` or an achievement category) for a user.
    fn fetch(&self, user_id: &str, endpoint: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// researchmap API client with request spacing.
pub struct ResearchmapClient {
    client: reqwest::Client,
    base_url: Url,
    request_delay: Duration,
}

impl ResearchmapClient {
    /// Create a new ResearchmapClient
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nenpo-seika/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| NenpoError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| NenpoError::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(NenpoError::Config(format!(
                "Base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            request_delay: config.request_delay,
        })
    }

    /// `<base>/<user_id>/<endpoint>`
    fn endpoint_url(&self, user_id: &str, endpoint: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NenpoError::Config(format!("Base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push(user_id)
            .push(endpoint);
        Ok(url)
    }

    async fn do_fetch(&self, url: Url) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), error = %error_text, "API error");
            return Err(NenpoError::Api {
                code: status.as_u16() as i32,
                message: format!("researchmap API error: {} - {}", status, error_text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| NenpoError::Parse(format!("Failed to parse researchmap response: {}", e)))
    }
}

impl RecordSource for ResearchmapClient {
    async fn fetch(&self, user_id: &str, endpoint: &str) -> Result<Value> {
        let url = self.endpoint_url(user_id, endpoint)?;
        debug!(url = %url, "Fetching researchmap endpoint");

        let result = self.do_fetch(url).await;

        // Rate limiting: keep calls spaced even when one fails
        tokio::time::sleep(self.request_delay).await;

        result
    }
}

/// In-memory record source keyed by user id and endpoint.
///
/// Endpoints that were never inserted answer with an empty object, which
/// extracts to no items.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    users: HashMap<String, HashMap<String, Value>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response of one endpoint
    pub fn insert(&mut self, user_id: impl Into<String>, endpoint: impl Into<String>, response: Value) {
        self.users
            .entry(user_id.into())
            .or_default()
            .insert(endpoint.into(), response);
    }

    /// Register all endpoint responses of one user
    pub fn insert_user(&mut self, user_id: impl Into<String>, records: HashMap<String, Value>) {
        let user_id = user_id.into();
        info!(user_id = %user_id, endpoints = records.len(), "Loaded static records");
        self.users.entry(user_id).or_default().extend(records);
    }
}

impl RecordSource for StaticSource {
    async fn fetch(&self, user_id: &str, endpoint: &str) -> Result<Value> {
        let user = self.users.get(user_id).ok_or_else(|| NenpoError::Api {
            code: 404,
            message: format!("unknown user '{}'", user_id),
        })?;
        Ok(user.get(endpoint).cloned().unwrap_or_else(|| json!({})))
    }
}
