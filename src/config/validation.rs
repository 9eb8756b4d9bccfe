use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks that numeric limits are sensible, the digest budgets are
/// consistent, and every configured endpoint is a well-formed URL.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.collector.max_posts_per_channel == 0 {
        return Err(ConfigError::Validation(
            "collector.max-posts-per-channel must be greater than 0".to_string(),
        ));
    }

    if config.collector.min_text_length == 0 {
        return Err(ConfigError::Validation(
            "collector.min-text-length must be greater than 0".to_string(),
        ));
    }

    if config.extractor.max_text_length == 0 {
        return Err(ConfigError::Validation(
            "extractor.max-text-length must be greater than 0".to_string(),
        ));
    }

    if config.extractor.cache_capacity == 0 {
        return Err(ConfigError::Validation(
            "extractor.cache-capacity must be greater than 0".to_string(),
        ));
    }

    if config.extractor.fetch_timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "extractor.fetch-timeout-seconds must be greater than 0".to_string(),
        ));
    }

    if config.digest.child_length > config.digest.max_length {
        return Err(ConfigError::Validation(
            "digest.child-length must not exceed digest.max-length".to_string(),
        ));
    }

    if config.store.retry_attempts == 0 {
        return Err(ConfigError::Validation(
            "store.retry-attempts must be greater than 0".to_string(),
        ));
    }

    if config.server.rate_per_second <= 0.0 {
        return Err(ConfigError::Validation(
            "server.rate-per-second must be positive".to_string(),
        ));
    }

    if config.server.burst == 0 {
        return Err(ConfigError::Validation(
            "server.burst must be greater than 0".to_string(),
        ));
    }

    if config.reddit.scope.trim().is_empty() {
        return Err(ConfigError::Validation(
            "reddit.scope must not be empty".to_string(),
        ));
    }

    for (label, value) in [
        ("reddit.data-url", &config.reddit.data_url),
        ("reddit.oauth-url", &config.reddit.oauth_url),
        ("reddit.web-url", &config.reddit.web_url),
        ("reddit.redirect-uri", &config.reddit.redirect_uri),
        ("store.base-url", &config.store.base_url),
    ] {
        Url::parse(value).map_err(|e| {
            ConfigError::Validation(format!("{} is not a valid URL: {}", label, e))
        })?;
    }

    Ok(())
}
