//! Size-bounded composite digests

use crate::config::DigestConfig;
use crate::extract::truncate_with_ellipsis;
use crate::listing::ListingItem;

/// Assembles one digest per visited node from its own text and its
/// children's text
///
/// The total is checked after each child, so it may overflow the budget by
/// at most one child's contribution. Downstream consumers truncate again
/// themselves.
pub struct DigestBuilder {
    max_length: usize,
    child_length: usize,
    body_length: usize,
    min_child_length: usize,
}

impl DigestBuilder {
    pub fn new(config: &DigestConfig, min_child_length: usize) -> Self {
        Self {
            max_length: config.max_length,
            child_length: config.child_length,
            body_length: config.body_length,
            min_child_length,
        }
    }

    /// Builds the digest string for a node and its fetched children,
    /// children in fetch order
    pub fn build(&self, node: &ListingItem, own_text: &str, children: &[(String, String)]) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}: {}\n\n",
            node.kind().label(),
            truncate_with_ellipsis(own_text, self.body_length)
        ));

        for (kind_label, text) in children {
            let text = truncate_with_ellipsis(text, self.child_length);
            if text.len() < self.min_child_length {
                continue;
            }
            out.push_str(&format!("{kind_label}: {text}\n\n"));
            if out.len() >= self.max_length {
                break;
            }
        }

        out
    }
}
