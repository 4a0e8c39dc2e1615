mod document;
pub use document::latest_stable_from_document;

use crate::error::{FetchError, ResolverError};
use crate::version::Edition;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

/// Source of the latest stable IDE version.
pub trait UpdateFeed {
    fn latest_stable(
        &self,
        edition: Edition,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// The JetBrains `updates.xml` feed.
#[derive(Debug, Clone)]
pub struct JetbrainsUpdateFeed {
    client: Client,
    url: Url,
}

impl JetbrainsUpdateFeed {
    /// Prepare the feed client.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ResolverError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .redirect(Policy::limited(10))
            .timeout(timeout)
            .hickory_dns(true)
            .build()?;

        Ok(Self { client, url })
    }

    #[tracing::instrument(skip(self), fields(url = self.url.as_str()))]
    async fn download(&self) -> Result<String, FetchError> {
        let started = Instant::now();

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Update feed returned status {}: {}", status, self.url);
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;

        tracing::info!(
            "Downloaded {}, took {} ms ({} B)",
            self.url,
            started.elapsed().as_millis(),
            body.len()
        );

        Ok(body)
    }
}

impl UpdateFeed for JetbrainsUpdateFeed {
    async fn latest_stable(&self, edition: Edition) -> Result<String, FetchError> {
        let body = self.download().await?;
        latest_stable_from_document(&body, edition)
    }
}
