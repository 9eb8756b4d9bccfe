//! Flat output records sent to the content store

use crate::listing::ListingItem;
use serde::Serialize;

/// Source tag stamped on every stored record
pub const SOURCE: &str = "REDDIT";

/// One visited item, flattened for storage
///
/// Fields that do not apply to the item's kind are serialized as absent
/// rather than as zero values.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub source: &'static str,

    /// Unique id across the source; the item's `name`
    pub cid: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Short human-facing name; only channels have one
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub kind: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,

    pub text: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,

    #[serde(skip_serializing_if = "is_zero_f64")]
    pub created: f64,

    #[serde(skip_serializing_if = "is_zero_i64")]
    pub score: i64,

    #[serde(skip_serializing_if = "is_zero_i64")]
    pub comments: i64,

    #[serde(skip_serializing_if = "is_zero_i64")]
    pub subscribers: i64,

    #[serde(rename = "likes", skip_serializing_if = "is_zero_i64")]
    pub ups: i64,

    #[serde(rename = "likes_ratio", skip_serializing_if = "is_zero_f64")]
    pub upvote_ratio: f64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub digest: String,
}

impl ContentRecord {
    /// Flattens a visited item, its extracted text, and its digest into a
    /// storable record. `web_url` prefixes the item's site-relative link.
    pub fn from_item(item: &ListingItem, text: &str, digest: &str, web_url: &str) -> Self {
        let display_name = match item {
            ListingItem::Channel(c) => c.display_name.clone(),
            _ => String::new(),
        };
        // Channels report their own subscriber count; posts and comments
        // report their channel's.
        Self {
            source: SOURCE,
            cid: item.name().to_string(),
            title: item.title().to_string(),
            name: display_name,
            kind: item.kind().label().to_string(),
            channel: item.channel().to_string(),
            text: text.to_string(),
            url: format!("{}{}", web_url.trim_end_matches('/'), item.site_path()),
            category: item.category().to_string(),
            author: item.author().to_string(),
            created: item.created(),
            score: item.score(),
            comments: item.num_comments(),
            subscribers: item.subscribers(),
            ups: item.ups(),
            upvote_ratio: item.upvote_ratio(),
            digest: digest.to_string(),
        }
    }
}

/// Relationship between the session user and a visited item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The user subscribes to, moderates, or contributes to the channel
    Joined,
    /// The user wrote the post or comment
    Authored,
}

/// One user-to-item engagement fact
#[derive(Debug, Clone, Serialize)]
pub struct EngagementRecord {
    pub username: String,
    pub source: &'static str,
    pub cid: String,
    pub action: Action,
}

impl EngagementRecord {
    pub fn new(username: &str, cid: &str, action: Action) -> Self {
        Self {
            username: username.to_string(),
            source: SOURCE,
            cid: cid.to_string(),
            action,
        }
    }
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

fn is_zero_f64(v: &f64) -> bool {
    *v == 0.0
}
