//! Traversal, digest assembly, and output records
//!
//! The engine walks subscribed channels into their hot posts and one level
//! of comments, deduplicating by item name and honoring a per-channel post
//! quota. Each visited node becomes one content record carrying a digest of
//! itself and its children, plus at most one engagement record.

mod digest;
mod engagement;
mod engine;
mod record;
mod service;

pub use digest::DigestBuilder;
pub use engagement::classify;
pub use engine::{CrawlEngine, CrawlOutput};
pub use record::{Action, ContentRecord, EngagementRecord, SOURCE};
pub use service::{CollectorService, RunSummary};
