//! Percolate: a social-content digest collector
//!
//! This crate authenticates against Reddit, walks a bounded tree of
//! channels -> posts -> comments per account, extracts normalized text from
//! each node, assembles a size-bounded digest per node, and forwards the
//! results to a downstream content store.

pub mod collector;
pub mod config;
pub mod extract;
pub mod listing;
pub mod server;
pub mod session;
pub mod store;

use thiserror::Error;

/// Main error type for Percolate operations
#[derive(Debug, Error)]
pub enum PercolateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Any of these is fatal at startup, before a crawl begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing required credential in environment: {0}")]
    MissingCredential(&'static str),
}

/// Authentication errors
///
/// Non-retryable: an authentication failure skips that account's entire run
/// but never aborts the runs of other accounts.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("insufficient credentials")]
    InsufficientCredentials,

    /// The token endpoint rejected the grant; carries the upstream
    /// failure message verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Token endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Transient fetch errors on listing or article requests
///
/// Caught at the call site, logged, and treated as an empty result so the
/// traversal continues with degraded data for that subtree.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("request to {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to decode listing from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Content-store errors
///
/// Logged after retries are exhausted; the crawl output for that run is lost
/// but the run itself is not considered failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned HTTP {0}")]
    Status(u16),

    #[error("store rejected request after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Result type alias for Percolate operations
pub type Result<T> = std::result::Result<T, PercolateError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use collector::{ContentRecord, CrawlEngine, CrawlOutput, EngagementRecord};
pub use config::{Config, Secrets};
pub use listing::{Kind, ListingItem};
pub use session::{Credentials, Session, SessionManager, SessionStore};
