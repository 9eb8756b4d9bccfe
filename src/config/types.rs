use crate::ConfigError;
use serde::Deserialize;

/// Main configuration structure for Percolate
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub collector: CollectorConfig,
    pub extractor: ExtractorConfig,
    pub digest: DigestConfig,
    pub reddit: RedditConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// How many posts per channel are followed one level into their comments
    #[serde(rename = "max-posts-per-channel")]
    pub max_posts_per_channel: u32,

    /// A similar channel is expanded only if it has at least this many subscribers
    #[serde(rename = "min-subscribers")]
    pub min_subscribers: i64,

    /// Items whose extracted text is shorter than this are dropped from output
    #[serde(rename = "min-text-length")]
    pub min_text_length: usize,

    /// Pause between accounts to avoid upstream rate limiting (seconds)
    #[serde(rename = "account-delay-seconds")]
    pub account_delay_seconds: u64,

    /// Whether subscribed channels also pull in similar channels as
    /// expansion candidates
    #[serde(rename = "expand-similar")]
    pub expand_similar: bool,
}

/// Text extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Extracted text longer than this is truncated with an ellipsis
    #[serde(rename = "max-text-length")]
    pub max_text_length: usize,

    /// Bound on the process-wide URL -> text cache
    #[serde(rename = "cache-capacity")]
    pub cache_capacity: usize,

    /// Timeout for article URL fetches (seconds)
    #[serde(rename = "fetch-timeout-seconds")]
    pub fetch_timeout_seconds: u64,

    /// URLs matching any of these prefixes/suffixes are never fetched
    #[serde(rename = "ignore-url-patterns", default = "default_ignore_patterns")]
    pub ignore_url_patterns: Vec<String>,
}

/// Digest assembly configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    /// Total digest byte budget; may overflow by at most one child's text
    #[serde(rename = "max-length")]
    pub max_length: usize,

    /// Per-child text budget inside a digest
    #[serde(rename = "child-length")]
    pub child_length: usize,

    /// Budget for the node's own text in the digest header line
    #[serde(rename = "body-length")]
    pub body_length: usize,
}

/// Upstream platform endpoints and OAuth parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    /// Authenticated data API base (listings, "who am I")
    #[serde(rename = "data-url")]
    pub data_url: String,

    /// OAuth base; token endpoint is `/access_token`, consent is `/authorize`
    #[serde(rename = "oauth-url")]
    pub oauth_url: String,

    /// Public site base used when building permalink URLs for stored items
    #[serde(rename = "web-url")]
    pub web_url: String,

    /// Redirect URI registered with the Reddit app
    #[serde(rename = "redirect-uri")]
    pub redirect_uri: String,

    /// Requested OAuth scope
    pub scope: String,
}

/// Downstream content store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Attempts for the content upsert before giving up
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between attempts (seconds)
    #[serde(rename = "retry-delay-seconds")]
    pub retry_delay_seconds: u64,
}

/// Inbound HTTP service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    pub bind: String,

    /// Token-bucket refill rate for the trigger endpoint (tokens per second)
    #[serde(rename = "rate-per-second")]
    pub rate_per_second: f64,

    /// Token-bucket burst size
    pub burst: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "app-name")]
    pub app_name: String,

    #[serde(rename = "app-version")]
    pub app_version: String,
}

impl UserAgentConfig {
    /// Formats the API user agent the way Reddit expects:
    /// `<platform>:<app name>:v<version>`
    pub fn api_user_agent(&self) -> String {
        format!(
            "{}:{}:v{}",
            std::env::consts::OS,
            self.app_name,
            self.app_version
        )
    }
}

fn default_ignore_patterns() -> Vec<String> {
    [
        "https://v.redd.it",
        "https://i.redd.it",
        "https://www.reddit.com/gallery",
        "https://www.youtube.com",
        ".png",
        ".jpeg",
        ".jpg",
        ".gif",
        ".webp",
        ".mp4",
        ".avi",
        ".mkv",
        ".mp3",
        ".wav",
        ".pdf",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Application credentials sourced from the environment
///
/// Loaded once at startup; a missing required entry is a fatal
/// `ConfigError` before any crawl begins.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Reddit application client id
    pub app_id: String,

    /// Reddit application client secret
    pub app_secret: String,

    /// Shared key for the inbound trigger and the downstream store
    pub api_key: String,

    /// Optional seed account collected on every run
    pub master_username: Option<String>,
    pub master_password: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app_id: require_env("PERCOLATE_APP_ID")?,
            app_secret: require_env("PERCOLATE_APP_SECRET")?,
            api_key: require_env("PERCOLATE_API_KEY")?,
            master_username: std::env::var("PERCOLATE_MASTER_USERNAME").ok(),
            master_password: std::env::var("PERCOLATE_MASTER_PASSWORD").ok(),
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential(name)),
    }
}
