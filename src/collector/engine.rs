//! Breadth-limited crawl traversal

use crate::collector::digest::DigestBuilder;
use crate::collector::engagement::classify;
use crate::collector::record::{ContentRecord, EngagementRecord};
use crate::config::CollectorConfig;
use crate::extract::TextExtractor;
use crate::listing::{Channel, ListingClient, ListingItem, Post, SortMode};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// Everything one crawl run produced
#[derive(Debug, Default)]
pub struct CrawlOutput {
    pub contents: Vec<ContentRecord>,
    pub engagements: Vec<EngagementRecord>,
    /// True when the run stopped early on a cancellation signal
    pub cancelled: bool,
}

/// One account's crawl run
///
/// Owns all per-run state: the visited set, the per-item text memo, and the
/// accumulating output. Traversal order is subscribed channels, then each
/// channel's hot posts one level into their comments, then similar channels
/// one level without further expansion.
///
/// A name is fetched and expanded at most once per run. The per-channel post
/// quota is decremented on every post-following decision, whether or not
/// that post was already visited through another channel.
pub struct CrawlEngine<'a> {
    client: &'a ListingClient,
    extractor: &'a TextExtractor,
    digests: DigestBuilder,
    config: &'a CollectorConfig,
    web_url: &'a str,
    username: String,
    visited: HashSet<String>,
    texts: HashMap<String, String>,
    output: CrawlOutput,
}

impl<'a> CrawlEngine<'a> {
    pub fn new(
        client: &'a ListingClient,
        extractor: &'a TextExtractor,
        digests: DigestBuilder,
        config: &'a CollectorConfig,
        web_url: &'a str,
        username: &str,
    ) -> Self {
        Self {
            client,
            extractor,
            digests,
            config,
            web_url,
            username: username.to_string(),
            visited: HashSet::new(),
            texts: HashMap::new(),
            output: CrawlOutput::default(),
        }
    }

    /// Runs the traversal to completion or until `cancel` is raised
    pub async fn collect(mut self, cancel: &AtomicBool) -> CrawlOutput {
        let channels = match self.client.subscribed_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                tracing::warn!("Failed to list subscribed channels: {}", e);
                return self.output;
            }
        };
        tracing::info!("Crawling {} subscribed channels", channels.len());

        for item in channels {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!("Crawl cancelled");
                self.output.cancelled = true;
                break;
            }
            let ListingItem::Channel(channel) = &item else {
                continue;
            };

            let children = self.visit_channel(channel, self.config.expand_similar).await;

            // Fresh quota for every subscribed channel.
            let mut quota = self.config.max_posts_per_channel;
            for child in children {
                if cancel.load(Ordering::Relaxed) {
                    self.output.cancelled = true;
                    break;
                }
                match child {
                    ListingItem::Post(post) if quota > 0 => {
                        quota -= 1;
                        self.visit_post(&post).await;
                    }
                    ListingItem::Channel(similar)
                        if similar.subscribers >= self.config.min_subscribers =>
                    {
                        // Similar channels are visited but their own posts
                        // and similars are not followed, bounding fan-out.
                        self.visit_channel(&similar, false).await;
                    }
                    _ => {}
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} contents, {} engagements",
            self.output.contents.len(),
            self.output.engagements.len()
        );
        self.output
    }

    /// Visits one channel: fetches its hot posts (and optionally similar
    /// channels), emits its record, and returns the depth-1 frontier
    async fn visit_channel(&mut self, channel: &Channel, expand_similar: bool) -> Vec<ListingItem> {
        if !self.visited.insert(channel.name.clone()) {
            return Vec::new();
        }

        let item = ListingItem::Channel(channel.clone());
        let posts = match self.client.posts(Some(channel), SortMode::Hot).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Failed to fetch posts for {}: {}", channel.display_name_prefixed, e);
                Vec::new()
            }
        };

        self.emit(&item, &posts).await;

        let mut children = posts;
        if expand_similar {
            match self.client.similar_channels(channel).await {
                Ok(similar) => children.extend(similar),
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch similar channels for {}: {}",
                        channel.display_name_prefixed,
                        e
                    );
                }
            }
        }
        children
    }

    /// Visits one post: fetches its comments one level and emits its record.
    /// Comments are never expanded further.
    async fn visit_post(&mut self, post: &Post) {
        if !self.visited.insert(post.name.clone()) {
            return;
        }

        let item = ListingItem::Post(post.clone());
        let comments = match self.client.comments(post).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::warn!("Failed to fetch comments for {}: {}", post.name, e);
                Vec::new()
            }
        };

        self.emit(&item, &comments).await;
    }

    /// Extracts text, builds the digest, classifies engagement, and pushes
    /// the output records for one visited node
    async fn emit(&mut self, item: &ListingItem, children: &[ListingItem]) {
        let own_text = self.text_for(item).await;

        let mut child_texts = Vec::with_capacity(children.len());
        for child in children {
            let text = self.text_for(child).await;
            child_texts.push((child.kind().label().to_string(), text));
        }
        let digest = self.digests.build(item, &own_text, &child_texts);

        if let Some(engagement) = classify(&self.username, item) {
            self.output.engagements.push(engagement);
        }

        // Visiting still counted against dedup and quota; only the stored
        // record is withheld for near-empty text.
        if own_text.len() < self.config.min_text_length {
            tracing::debug!("Dropping {} for short text", item.name());
            return;
        }

        self.output
            .contents
            .push(ContentRecord::from_item(item, &own_text, &digest, self.web_url));
    }

    /// Per-run memo of each item's extracted text, keyed by name
    async fn text_for(&mut self, item: &ListingItem) -> String {
        if let Some(text) = self.texts.get(item.name()) {
            return text.clone();
        }
        let text = self.extractor.extract(item).await;
        self.texts.insert(item.name().to_string(), text.clone());
        text
    }
}
