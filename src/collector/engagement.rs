//! Deriving user-to-item engagement facts

use crate::collector::record::{Action, EngagementRecord};
use crate::listing::ListingItem;

/// At most one engagement fact per visited item
///
/// A channel the user belongs to in any capacity is `joined`; a post or
/// comment the user wrote is `authored`. Engagement is independent of
/// whether the item itself survives the output filters.
pub fn classify(username: &str, item: &ListingItem) -> Option<EngagementRecord> {
    match item {
        ListingItem::Channel(channel) => {
            if channel.user_is_subscriber
                || channel.user_is_moderator
                || channel.user_is_contributor
            {
                Some(EngagementRecord::new(username, &channel.name, Action::Joined))
            } else {
                None
            }
        }
        ListingItem::Post(post) => {
            (!username.is_empty() && post.author == username)
                .then(|| EngagementRecord::new(username, &post.name, Action::Authored))
        }
        ListingItem::Comment(comment) => {
            (!username.is_empty() && comment.author == username)
                .then(|| EngagementRecord::new(username, &comment.name, Action::Authored))
        }
    }
}
