//! Forwarding crawl output to the downstream content store

use crate::collector::{ContentRecord, EngagementRecord};
use crate::config::StoreConfig;
use crate::StoreError;
use async_trait::async_trait;
use std::time::Duration;

/// Destination for crawl output
///
/// The collector only knows this seam; tests substitute a capturing
/// implementation.
#[async_trait]
pub trait ContentSink: Send + Sync {
    async fn store_contents(&self, contents: &[ContentRecord]) -> Result<(), StoreError>;
    async fn store_engagements(&self, engagements: &[EngagementRecord]) -> Result<(), StoreError>;
}

/// HTTP client for the content store service
///
/// Content batches are retried a configured number of times with a fixed
/// delay; engagement batches are best-effort single attempts.
pub struct HttpContentStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpContentStore {
    pub fn new(
        config: &StoreConfig,
        api_key: &str,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            retry_attempts: config.retry_attempts,
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
        })
    }

    async fn post<T: serde::Serialize>(&self, path: &str, body: &[T]) -> Result<(), StoreError> {
        let endpoint = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&endpoint)
            .header("X-API-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSink for HttpContentStore {
    async fn store_contents(&self, contents: &[ContentRecord]) -> Result<(), StoreError> {
        for attempt in 1..=self.retry_attempts {
            match self.post("/contents", contents).await {
                Ok(()) => {
                    tracing::info!("Stored {} content records", contents.len());
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        "Content store attempt {}/{} failed: {}",
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    if attempt < self.retry_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        Err(StoreError::RetriesExhausted {
            attempts: self.retry_attempts,
        })
    }

    async fn store_engagements(&self, engagements: &[EngagementRecord]) -> Result<(), StoreError> {
        self.post("/engagements", engagements).await?;
        tracing::info!("Stored {} engagement records", engagements.len());
        Ok(())
    }
}
