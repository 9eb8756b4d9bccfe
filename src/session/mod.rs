//! Account credentials and authenticated sessions

mod manager;
mod store;

pub use manager::SessionManager;
pub use store::{MemorySessionStore, SessionStore};

use serde::Deserialize;

/// Everything known about one account before authentication
///
/// Any single field besides `user_id` may be absent; the manager picks the
/// strongest grant the credentials support.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Local identifier for the account, not sent to the platform
    pub user_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Credentials for a password-grant account
    pub fn with_password(user_id: &str, username: &str, password: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            ..Self::default()
        }
    }

    /// Credentials holding only a refresh token
    pub fn with_refresh_token(user_id: &str, refresh_token: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            refresh_token: Some(refresh_token.to_string()),
            ..Self::default()
        }
    }
}

/// An authenticated session ready for listing calls
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    /// Display name reported by the identity endpoint, when it answered
    pub display_name: Option<String>,
}

/// Token endpoint response; `message` is populated on rejection
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Identity endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct IdentityResponse {
    #[serde(default)]
    pub name: String,
}
