//! Configuration module
//!
//! Tunables are loaded from a TOML file; application credentials (the Reddit
//! app identity and the internal API key) come from the environment so they
//! never land in a checked-in file.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{
    CollectorConfig, Config, DigestConfig, ExtractorConfig, RedditConfig, Secrets, ServerConfig,
    StoreConfig, UserAgentConfig,
};
pub use validation::validate;
