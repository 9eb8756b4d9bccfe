use crate::config::RedditConfig;
use crate::session::{Credentials, IdentityResponse, Session, TokenResponse};
use crate::AuthError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns stored credentials into live sessions via the token endpoint
///
/// Every grant is authenticated with the application identity through HTTP
/// basic auth, as the platform requires for installed/script apps.
pub struct SessionManager {
    http: Client,
    app_id: String,
    app_secret: String,
    data_url: String,
    oauth_url: String,
    redirect_uri: String,
    scope: String,
}

impl SessionManager {
    pub fn new(
        reddit: &RedditConfig,
        user_agent: &str,
        app_id: &str,
        app_secret: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(TOKEN_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            app_id: app_id.to_string(),
            app_secret: app_secret.to_string(),
            data_url: reddit.data_url.trim_end_matches('/').to_string(),
            oauth_url: reddit.oauth_url.trim_end_matches('/').to_string(),
            redirect_uri: reddit.redirect_uri.clone(),
            scope: reddit.scope.clone(),
        })
    }

    /// Authenticates one account with the strongest grant its credentials
    /// support: refresh token first, then password, then a bare stored
    /// access token.
    pub async fn authenticate(&self, creds: &Credentials) -> Result<Session, AuthError> {
        let token = if let Some(refresh_token) = &creds.refresh_token {
            self.grant(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?
            .access_token
        } else if let (Some(username), Some(password)) = (&creds.username, &creds.password) {
            self.grant(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .await?
            .access_token
        } else if let Some(access_token) = &creds.access_token {
            access_token.clone()
        } else {
            return Err(AuthError::InsufficientCredentials);
        };

        let display_name = self.identity(&token).await;

        Ok(Session {
            user_id: creds.user_id.clone(),
            access_token: token,
            display_name,
        })
    }

    /// Exchanges an OAuth authorization code for long-lived credentials
    pub async fn exchange_code(
        &self,
        user_id: &str,
        code: &str,
    ) -> Result<Credentials, AuthError> {
        let token = self
            .grant(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
            ])
            .await?;

        Ok(Credentials {
            user_id: user_id.to_string(),
            access_token: Some(token.access_token),
            refresh_token: token.refresh_token,
            ..Credentials::default()
        })
    }

    /// Builds the consent-page URL a user visits to authorize the app
    pub fn authorize_url(&self, state: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/authorize", self.oauth_url))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.app_id)
            .append_pair("response_type", "code")
            .append_pair("state", state)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("duration", "permanent")
            .append_pair("scope", &self.scope);
        Ok(url)
    }

    async fn grant(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let endpoint = format!("{}/access_token", self.oauth_url);

        let response = self
            .http
            .post(&endpoint)
            .basic_auth(&self.app_id, Some(&self.app_secret))
            .form(form)
            .send()
            .await?;

        let token: TokenResponse = response.json().await?;

        // The token endpoint reports grant failures with 200 and a message
        // body rather than an error status.
        if !token.message.is_empty() {
            return Err(AuthError::Rejected(token.message));
        }
        if token.access_token.is_empty() {
            return Err(AuthError::Rejected("empty access token".to_string()));
        }

        Ok(token)
    }

    /// Asks the identity endpoint who this token belongs to. Failure here is
    /// tolerated; the session proceeds without a display name.
    async fn identity(&self, access_token: &str) -> Option<String> {
        let endpoint = format!("{}/api/v1/me", self.data_url);

        let result = self
            .http
            .get(&endpoint)
            .bearer_auth(access_token)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<IdentityResponse>().await {
                    Ok(identity) if !identity.name.is_empty() => Some(identity.name),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::warn!("Failed to decode identity response: {}", e);
                        None
                    }
                }
            }
            Ok(response) => {
                tracing::warn!("Identity endpoint returned HTTP {}", response.status());
                None
            }
            Err(e) => {
                tracing::warn!("Identity endpoint unreachable: {}", e);
                None
            }
        }
    }
}
