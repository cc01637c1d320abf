use std::time::Duration;

use async_trait::async_trait;

/// Retrieval of a document over the network.
///
/// The service uses [`HttpFetcher`]; tests substitute canned implementations so
/// no test ever touches the network.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Returns the response body, or a human-readable reason on transport
    /// failure or a non-success status.
    async fn fetch(&self, url: &str) -> Result<String, String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: u64) -> Result<HttpFetcher, String> {
        let client = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .user_agent(concat!("branchcompare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| error.to_string())?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(error) => return Err(error.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP status {}", status));
        }

        response.text().await.map_err(|error| error.to_string())
    }
}
