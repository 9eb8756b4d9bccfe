//! Typed listing items and envelope decoding
//!
//! The wire format carries a single superset record for every item kind;
//! that superset exists only at this boundary. Decoded items are a sum type
//! over the three canonical kinds, each variant exposing only its relevant
//! fields.

use serde::Deserialize;

/// Canonical item kind, normalized from the platform's short codes
///
/// Unrecognized codes are preserved as [`Kind::Other`] rather than dropped,
/// so a kind filter can still see (and reject) them explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Channel,
    Post,
    Comment,
    Other(String),
}

impl Kind {
    /// Normalizes a raw kind code (`t5`/`t3`/`t1`) into a canonical kind
    pub fn from_code(code: &str) -> Self {
        match code {
            "t5" => Kind::Channel,
            "t3" => Kind::Post,
            "t1" => Kind::Comment,
            other => Kind::Other(other.to_string()),
        }
    }

    /// Short lowercase label used in digests and stored records
    pub fn label(&self) -> &str {
        match self {
            Kind::Channel => "channel",
            Kind::Post => "post",
            Kind::Comment => "comment",
            Kind::Other(code) => code,
        }
    }
}

/// A topical content container (subreddit)
#[derive(Debug, Clone, Default)]
pub struct Channel {
    /// Globally unique identifier across all kinds; the dedup key
    pub name: String,
    pub display_name: String,
    /// Prefixed form, e.g. "r/rust"; doubles as the listing path segment
    pub display_name_prefixed: String,
    pub title: String,
    /// Site-relative link to the channel
    pub url: String,
    pub public_description_html: String,
    pub description_html: String,
    pub category: String,
    pub subscribers: i64,
    pub user_is_subscriber: bool,
    pub user_is_moderator: bool,
    pub user_is_contributor: bool,
}

/// A user-submitted item within a channel
#[derive(Debug, Clone, Default)]
pub struct Post {
    pub name: String,
    pub id: String,
    pub title: String,
    pub channel: String,
    pub channel_prefixed: String,
    /// Self-text body; empty for link posts
    pub selftext_html: String,
    /// External URL for link posts
    pub url: String,
    pub permalink: String,
    pub flair: String,
    pub author: String,
    pub created: f64,
    pub score: i64,
    pub num_comments: i64,
    pub channel_subscribers: i64,
    pub ups: i64,
    pub upvote_ratio: f64,
}

/// A reply to a post or another comment
#[derive(Debug, Clone, Default)]
pub struct Comment {
    pub name: String,
    pub id: String,
    pub channel_prefixed: String,
    pub body_html: String,
    /// Which post or comment this responds to
    pub parent: String,
    pub permalink: String,
    pub author: String,
    pub created: f64,
    pub score: i64,
    pub ups: i64,
    pub channel_subscribers: i64,
}

/// A decoded, typed listing item
#[derive(Debug, Clone)]
pub enum ListingItem {
    Channel(Channel),
    Post(Post),
    Comment(Comment),
}

impl ListingItem {
    /// The globally unique `name`, the dedup key for the traversal
    pub fn name(&self) -> &str {
        match self {
            ListingItem::Channel(c) => &c.name,
            ListingItem::Post(p) => &p.name,
            ListingItem::Comment(c) => &c.name,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            ListingItem::Channel(_) => Kind::Channel,
            ListingItem::Post(_) => Kind::Post,
            ListingItem::Comment(_) => Kind::Comment,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ListingItem::Channel(c) => &c.title,
            ListingItem::Post(p) => &p.title,
            ListingItem::Comment(_) => "",
        }
    }

    /// Author of posts or comments; empty for channels
    pub fn author(&self) -> &str {
        match self {
            ListingItem::Channel(_) => "",
            ListingItem::Post(p) => &p.author,
            ListingItem::Comment(c) => &c.author,
        }
    }

    /// Channel this item lives in (the channel itself for channels)
    pub fn channel(&self) -> &str {
        match self {
            ListingItem::Channel(c) => &c.display_name_prefixed,
            ListingItem::Post(p) => &p.channel_prefixed,
            ListingItem::Comment(c) => &c.channel_prefixed,
        }
    }

    /// Subscriber count of the item's channel
    pub fn subscribers(&self) -> i64 {
        match self {
            ListingItem::Channel(c) => c.subscribers,
            ListingItem::Post(p) => p.channel_subscribers,
            ListingItem::Comment(c) => c.channel_subscribers,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            ListingItem::Channel(c) => &c.category,
            ListingItem::Post(p) => &p.flair,
            ListingItem::Comment(_) => "",
        }
    }

    pub fn created(&self) -> f64 {
        match self {
            ListingItem::Channel(_) => 0.0,
            ListingItem::Post(p) => p.created,
            ListingItem::Comment(c) => c.created,
        }
    }

    pub fn score(&self) -> i64 {
        match self {
            ListingItem::Channel(_) => 0,
            ListingItem::Post(p) => p.score,
            ListingItem::Comment(c) => c.score,
        }
    }

    pub fn num_comments(&self) -> i64 {
        match self {
            ListingItem::Post(p) => p.num_comments,
            _ => 0,
        }
    }

    pub fn ups(&self) -> i64 {
        match self {
            ListingItem::Channel(_) => 0,
            ListingItem::Post(p) => p.ups,
            ListingItem::Comment(c) => c.ups,
        }
    }

    pub fn upvote_ratio(&self) -> f64 {
        match self {
            ListingItem::Post(p) => p.upvote_ratio,
            _ => 0.0,
        }
    }

    /// Site-relative link for the item (channel URL or permalink)
    pub fn site_path(&self) -> &str {
        match self {
            ListingItem::Channel(c) => &c.url,
            ListingItem::Post(p) => &p.permalink,
            ListingItem::Comment(c) => &c.permalink,
        }
    }
}

/// Raw superset record the platform serializes for every kind
///
/// Every field is optional: the platform omits or nulls whatever does not
/// apply to the item's kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    display_name_prefixed: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subreddit: Option<String>,
    #[serde(default)]
    subreddit_name_prefixed: Option<String>,
    #[serde(default)]
    link_id: Option<String>,
    #[serde(default)]
    body_html: Option<String>,
    #[serde(default)]
    selftext_html: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    public_description_html: Option<String>,
    #[serde(default)]
    description_html: Option<String>,
    #[serde(default)]
    advertiser_category: Option<String>,
    #[serde(default)]
    link_flair_text: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    created: Option<f64>,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    num_comments: Option<i64>,
    #[serde(default)]
    subscribers: Option<i64>,
    #[serde(default)]
    subreddit_subscribers: Option<i64>,
    #[serde(default)]
    ups: Option<i64>,
    #[serde(default)]
    upvote_ratio: Option<f64>,
    #[serde(default)]
    user_is_subscriber: Option<bool>,
    #[serde(default)]
    user_is_moderator: Option<bool>,
    #[serde(default)]
    user_is_contributor: Option<bool>,
}

impl RawItem {
    /// Builds the typed variant for a canonical kind
    ///
    /// Returns `None` for non-canonical kinds; callers filter on kind before
    /// conversion, so unrecognized codes simply never match the filter.
    fn into_item(self, kind: &Kind) -> Option<ListingItem> {
        match kind {
            Kind::Channel => Some(ListingItem::Channel(Channel {
                name: self.name.unwrap_or_default(),
                display_name: self.display_name.unwrap_or_default(),
                display_name_prefixed: self.display_name_prefixed.unwrap_or_default(),
                title: self.title.unwrap_or_default(),
                url: self.url.unwrap_or_default(),
                public_description_html: self.public_description_html.unwrap_or_default(),
                description_html: self.description_html.unwrap_or_default(),
                category: self.advertiser_category.unwrap_or_default(),
                subscribers: self.subscribers.unwrap_or_default(),
                user_is_subscriber: self.user_is_subscriber.unwrap_or_default(),
                user_is_moderator: self.user_is_moderator.unwrap_or_default(),
                user_is_contributor: self.user_is_contributor.unwrap_or_default(),
            })),
            Kind::Post => Some(ListingItem::Post(Post {
                name: self.name.unwrap_or_default(),
                id: self.id.unwrap_or_default(),
                title: self.title.unwrap_or_default(),
                channel: self.subreddit.unwrap_or_default(),
                channel_prefixed: self.subreddit_name_prefixed.unwrap_or_default(),
                selftext_html: self.selftext_html.unwrap_or_default(),
                url: self.url.unwrap_or_default(),
                permalink: self.permalink.unwrap_or_default(),
                flair: self.link_flair_text.unwrap_or_default(),
                author: self.author.unwrap_or_default(),
                created: self.created.unwrap_or_default(),
                score: self.score.unwrap_or_default(),
                num_comments: self.num_comments.unwrap_or_default(),
                channel_subscribers: self.subreddit_subscribers.unwrap_or_default(),
                ups: self.ups.unwrap_or_default(),
                upvote_ratio: self.upvote_ratio.unwrap_or_default(),
            })),
            Kind::Comment => Some(ListingItem::Comment(Comment {
                name: self.name.unwrap_or_default(),
                id: self.id.unwrap_or_default(),
                channel_prefixed: self.subreddit_name_prefixed.unwrap_or_default(),
                body_html: self.body_html.unwrap_or_default(),
                parent: self.link_id.unwrap_or_default(),
                permalink: self.permalink.unwrap_or_default(),
                author: self.author.unwrap_or_default(),
                created: self.created.unwrap_or_default(),
                score: self.score.unwrap_or_default(),
                ups: self.ups.unwrap_or_default(),
                channel_subscribers: self.subreddit_subscribers.unwrap_or_default(),
            })),
            Kind::Other(_) => None,
        }
    }
}

/// One page of the platform's nested listing envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Envelope>,
}

#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    kind: String,
    data: RawItem,
}

impl Listing {
    /// Flattens the envelope into typed items of the requested kind
    ///
    /// Order is preserved; items of any other kind (including unrecognized
    /// codes) are filtered out. Pagination tokens are not followed.
    pub fn items(self, filter: &Kind) -> Vec<ListingItem> {
        self.data
            .children
            .into_iter()
            .filter_map(|child| {
                let kind = Kind::from_code(&child.kind);
                if kind == *filter {
                    child.data.into_item(&kind)
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_normalization() {
        assert_eq!(Kind::from_code("t5"), Kind::Channel);
        assert_eq!(Kind::from_code("t3"), Kind::Post);
        assert_eq!(Kind::from_code("t1"), Kind::Comment);
    }

    #[test]
    fn test_unrecognized_kind_passes_through() {
        let kind = Kind::from_code("t4");
        assert_eq!(kind, Kind::Other("t4".to_string()));
        assert_eq!(kind.label(), "t4");
    }

    #[test]
    fn test_listing_decodes_and_filters_by_kind() {
        let raw = serde_json::json!({
            "data": {
                "children": [
                    {"kind": "t3", "data": {"name": "t3_aaa", "title": "First", "subreddit": "rust"}},
                    {"kind": "t5", "data": {"name": "t5_bbb", "display_name": "rust"}},
                    {"kind": "t3", "data": {"name": "t3_ccc", "title": "Second"}}
                ]
            }
        });

        let listing: Listing = serde_json::from_value(raw).unwrap();
        let posts = listing.items(&Kind::Post);

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].name(), "t3_aaa");
        assert_eq!(posts[1].name(), "t3_ccc");
        assert_eq!(posts[0].title(), "First");
    }

    #[test]
    fn test_listing_preserves_order() {
        let raw = serde_json::json!({
            "data": {
                "children": [
                    {"kind": "t1", "data": {"name": "t1_1"}},
                    {"kind": "t1", "data": {"name": "t1_2"}},
                    {"kind": "t1", "data": {"name": "t1_3"}}
                ]
            }
        });

        let listing: Listing = serde_json::from_value(raw).unwrap();
        let names: Vec<String> = listing
            .items(&Kind::Comment)
            .iter()
            .map(|i| i.name().to_string())
            .collect();

        assert_eq!(names, vec!["t1_1", "t1_2", "t1_3"]);
    }

    #[test]
    fn test_null_fields_decode_to_defaults() {
        let raw = serde_json::json!({
            "data": {
                "children": [
                    {"kind": "t5", "data": {
                        "name": "t5_xyz",
                        "display_name": "rust",
                        "title": null,
                        "subscribers": null,
                        "user_is_subscriber": null
                    }}
                ]
            }
        });

        let listing: Listing = serde_json::from_value(raw).unwrap();
        let channels = listing.items(&Kind::Channel);

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].subscribers(), 0);
        assert_eq!(channels[0].title(), "");
    }

    #[test]
    fn test_empty_envelope_decodes() {
        let listing: Listing = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(listing.items(&Kind::Post).is_empty());
    }
}
