//! Turning listing items into normalized plain text
//!
//! Channel and comment bodies come straight from their markup fields. Posts
//! fall back to fetching their linked article when they carry no text of
//! their own. Every result is whitespace-normalized and capped to the
//! configured length.

mod article;
mod cache;
mod html;
mod text;

pub use article::ArticleFetcher;
pub use cache::ExtractionCache;
pub use html::html_to_text;
pub use text::{normalize, truncate_with_ellipsis};

use crate::config::ExtractorConfig;
use crate::listing::ListingItem;

/// Extracts the display text for any listing item
pub struct TextExtractor {
    fetcher: ArticleFetcher,
    max_text_length: usize,
}

impl TextExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            fetcher: ArticleFetcher::new(config)?,
            max_text_length: config.max_text_length,
        })
    }

    /// Normalized text for an item, bounded by the configured maximum
    ///
    /// May hit the network for posts that link out instead of carrying a
    /// body. Returns an empty string rather than an error when nothing
    /// usable could be extracted.
    pub async fn extract(&self, item: &ListingItem) -> String {
        let raw = match item {
            ListingItem::Channel(channel) => {
                let short = html_to_text(&channel.public_description_html);
                let long = html_to_text(&channel.description_html);
                if long.is_empty() {
                    short
                } else if short.is_empty() {
                    long
                } else {
                    format!("{short}\n{long}")
                }
            }
            ListingItem::Post(post) => {
                let own = html_to_text(&post.selftext_html);
                if !own.trim().is_empty() {
                    own
                } else if !post.url.is_empty() {
                    self.fetcher.fetch(&post.url).await
                } else {
                    String::new()
                }
            }
            ListingItem::Comment(comment) => html_to_text(&comment.body_html),
        };

        truncate_with_ellipsis(&normalize(&raw), self.max_text_length)
    }
}
