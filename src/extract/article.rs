//! Fetching and main-content extraction for linked articles

use crate::config::ExtractorConfig;
use crate::extract::cache::ExtractionCache;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use std::time::Duration;

// Article hosts serve different markup to API-style agents, so article
// fetches identify as a desktop browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches linked pages and reduces them to their main content
///
/// Every outcome is cached, including failures as empty strings, so each
/// URL costs at most one network round trip per process lifetime.
pub struct ArticleFetcher {
    http: reqwest::Client,
    cache: ExtractionCache,
    ignore_patterns: Vec<String>,
}

impl ArticleFetcher {
    pub fn new(config: &ExtractorConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            cache: ExtractionCache::new(config.cache_capacity),
            ignore_patterns: config.ignore_url_patterns.clone(),
        })
    }

    /// Main-content text for a URL, or an empty string when the URL is
    /// ignored, unreachable, or not an HTML page
    pub async fn fetch(&self, url: &str) -> String {
        if let Some(cached) = self.cache.get(url) {
            return cached;
        }

        if self.is_ignored(url) {
            tracing::debug!("Skipping ignored URL: {}", url);
            self.cache.insert(url, "");
            return String::new();
        }

        let text = self.fetch_uncached(url).await;
        self.cache.insert(url, &text);
        text
    }

    /// True when the URL matches a configured prefix or extension pattern
    fn is_ignored(&self, url: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| {
            if pattern.starts_with('.') {
                url.ends_with(pattern.as_str())
            } else {
                url.starts_with(pattern.as_str())
            }
        })
    }

    async fn fetch_uncached(&self, url: &str) -> String {
        let response = match self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Article fetch failed for {}: {}", url, e);
                return String::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Article fetch for {} returned HTTP {}",
                url,
                response.status()
            );
            return String::new();
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("text/html"))
            .unwrap_or(false);
        if !is_html {
            tracing::debug!("Skipping non-HTML response from {}", url);
            return String::new();
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to read article body from {}: {}", url, e);
                return String::new();
            }
        };

        extract_main_content(url, &html)
    }
}

/// Readability-style reduction of a full page to its main content
fn extract_main_content(url: &str, html: &str) -> String {
    let parsed_url = url::Url::parse(url).ok();
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Text,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };

    transform_content_input(input, &config)
}
