//! Authenticated REST client for the platform's listing endpoints

use crate::listing::item::{Kind, Listing, ListingItem};
use crate::listing::{Channel, Post};
use crate::session::Session;
use crate::FetchError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Sort modes accepted by the posts endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Hot,
    Top,
    Best,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::Top => "top",
            SortMode::Best => "best",
        }
    }
}

/// Performs paginated-envelope REST calls over one authenticated session
///
/// Each operation flattens the response envelope into an ordered sequence of
/// typed items. One call yields at most one page per endpoint; "load more"
/// tokens are deliberately not followed.
pub struct ListingClient {
    http: Client,
    data_url: String,
    access_token: String,
}

impl ListingClient {
    /// Creates a client bound to a session's access token
    pub fn new(
        data_url: &str,
        user_agent: &str,
        session: &Session,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            data_url: data_url.trim_end_matches('/').to_string(),
            access_token: session.access_token.clone(),
        })
    }

    /// Channels the session's user is subscribed to
    pub async fn subscribed_channels(&self) -> Result<Vec<ListingItem>, FetchError> {
        let listing: Listing = self.get("/subreddits/mine/subscriber", &[]).await?;
        Ok(listing.items(&Kind::Channel))
    }

    /// Channels similar to the given channel; may contain duplicates
    pub async fn similar_channels(&self, channel: &Channel) -> Result<Vec<ListingItem>, FetchError> {
        let listing: Listing = self
            .get("/api/similar_subreddits", &[("sr_fullnames", &channel.name)])
            .await?;
        Ok(listing.items(&Kind::Channel))
    }

    /// Channels matching a search query
    pub async fn channel_search(&self, query: &str) -> Result<Vec<ListingItem>, FetchError> {
        let listing: Listing = self.get("/subreddits/search", &[("q", query)]).await?;
        Ok(listing.items(&Kind::Channel))
    }

    /// Posts in a channel, or the user's own feed when no channel is given
    pub async fn posts(
        &self,
        channel: Option<&Channel>,
        sort: SortMode,
    ) -> Result<Vec<ListingItem>, FetchError> {
        let path = match channel {
            Some(c) => format!("/{}/{}", c.display_name_prefixed, sort.as_str()),
            None => format!("/{}", sort.as_str()),
        };
        let listing: Listing = self.get(&path, &[]).await?;
        Ok(listing.items(&Kind::Post))
    }

    /// Comments for a post
    ///
    /// The platform returns multiple listing pages in one response; they are
    /// flattened into one sequence with order preserved.
    pub async fn comments(&self, post: &Post) -> Result<Vec<ListingItem>, FetchError> {
        let path = format!("/{}/comments/{}", post.channel_prefixed, post.id);
        let listings: Vec<Listing> = self.get(&path, &[]).await?;
        Ok(listings
            .into_iter()
            .flat_map(|listing| listing.items(&Kind::Comment))
            .collect())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let endpoint = format!("{}{}", self.data_url, path);

        let response = self
            .http
            .get(&endpoint)
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|source| FetchError::Decode {
            endpoint,
            source,
        })
    }
}
