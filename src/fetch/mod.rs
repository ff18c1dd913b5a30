use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::SchemaError;

const DEFAULT_TIMEOUT_SECS: u64 = 25;
const USER_AGENT: &str = "Mozilla/5.0 (compatible; SchemaAutomation/1.0)";

/// Raw markup of a fetched page plus the URL it finally resolved to after
/// redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: String,
}

/// External collaborator that turns a URL into page markup. The generation
/// core never talks to the network directly.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, SchemaError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, SchemaError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| SchemaError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|source| SchemaError::Fetch {
                url: url.to_string(),
                source,
            })?;

        debug!("Fetched {} ({} bytes)", final_url, html.len());

        Ok(FetchedPage { html, final_url })
    }
}
