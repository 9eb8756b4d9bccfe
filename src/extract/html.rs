//! Markup-to-text conversion for listing item bodies

use scraper::Html;

/// Renders an HTML fragment to plain text
///
/// Item bodies arrive entity-escaped, so the first parse yields the inner
/// markup as text and a second parse strips the tags themselves. Block
/// elements contribute their text in document order separated by newlines.
pub fn html_to_text(html: &str) -> String {
    let inner = fragment_text(html);
    let text = fragment_text(&inner);
    text.replace('\u{a0}', " ")
}

fn fragment_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    for node in fragment.root_element().text() {
        out.push_str(node);
    }
    out
}
