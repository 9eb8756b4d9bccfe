//! One collection run across every stored account

use crate::collector::digest::DigestBuilder;
use crate::collector::engine::CrawlEngine;
use crate::config::Config;
use crate::extract::TextExtractor;
use crate::listing::ListingClient;
use crate::session::{SessionManager, SessionStore};
use crate::store::ContentSink;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Counters reported after a collection run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Accounts that authenticated and were crawled
    pub accounts: usize,
    pub contents: usize,
    pub engagements: usize,
    pub cancelled: bool,
}

/// Crawls every stored account in sequence and forwards the output
///
/// Shared between the CLI one-shot mode and the HTTP trigger. One failing
/// account never stops the others; store failures lose that account's
/// output but not the run.
pub struct CollectorService {
    config: Config,
    manager: Arc<SessionManager>,
    sessions: Arc<dyn SessionStore>,
    sink: Arc<dyn ContentSink>,
    extractor: TextExtractor,
}

impl CollectorService {
    pub fn new(
        config: Config,
        manager: Arc<SessionManager>,
        sessions: Arc<dyn SessionStore>,
        sink: Arc<dyn ContentSink>,
    ) -> Result<Self, reqwest::Error> {
        let extractor = TextExtractor::new(&config.extractor)?;
        Ok(Self {
            config,
            manager,
            sessions,
            sink,
            extractor,
        })
    }

    /// Runs one crawl over all stored accounts, pausing between accounts to
    /// stay clear of upstream rate limits
    pub async fn collect_all(&self, cancel: &AtomicBool) -> RunSummary {
        let accounts = self.sessions.list();
        tracing::info!("Starting collection run for {} accounts", accounts.len());

        let mut summary = RunSummary::default();
        let delay = Duration::from_secs(self.config.collector.account_delay_seconds);

        for (index, creds) in accounts.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let session = match self.manager.authenticate(creds).await {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!("Skipping account {}: {}", creds.user_id, e);
                    continue;
                }
            };

            let username = session
                .display_name
                .clone()
                .or_else(|| creds.username.clone())
                .unwrap_or_default();

            let client = match ListingClient::new(
                &self.config.reddit.data_url,
                &self.config.user_agent.api_user_agent(),
                &session,
                Duration::from_secs(30),
            ) {
                Ok(client) => client,
                Err(e) => {
                    tracing::warn!("Skipping account {}: {}", creds.user_id, e);
                    continue;
                }
            };

            let engine = CrawlEngine::new(
                &client,
                &self.extractor,
                DigestBuilder::new(&self.config.digest, self.config.collector.min_text_length),
                &self.config.collector,
                &self.config.reddit.web_url,
                &username,
            );
            let output = engine.collect(cancel).await;

            summary.accounts += 1;
            summary.contents += output.contents.len();
            summary.engagements += output.engagements.len();

            if !output.contents.is_empty() {
                if let Err(e) = self.sink.store_contents(&output.contents).await {
                    tracing::error!("Failed to store contents for {}: {}", creds.user_id, e);
                }
            }
            if !output.engagements.is_empty() {
                if let Err(e) = self.sink.store_engagements(&output.engagements).await {
                    tracing::error!("Failed to store engagements for {}: {}", creds.user_id, e);
                }
            }

            if output.cancelled {
                summary.cancelled = true;
                break;
            }
        }

        tracing::info!(
            "Collection run finished: {} accounts, {} contents, {} engagements",
            summary.accounts,
            summary.contents,
            summary.engagements
        );
        summary
    }
}
