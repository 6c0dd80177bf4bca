//! The network boundary: one request per page, no retry.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::auth::AccessToken;
use crate::config::Config;
use crate::models::{Listing, ListingType, RawListing};

/// Errors surfaced by a page fetch.
///
/// Transport and decode failures collapse here; downstream components only
/// observe that the page failed, never why.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode listing payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Fetches one page of a listing.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Issue a single page request and parse the response.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on connectivity failure, a non-2xx status,
    /// or a payload that does not decode as a listing.
    async fn fetch(
        &self,
        sort: ListingType,
        after: Option<&str>,
        token: Option<&AccessToken>,
        path: &str,
    ) -> Result<Listing, FetchError>;
}

/// [`ListingFetcher`] backed by the live JSON API.
pub struct HttpListingFetcher {
    client: reqwest::Client,
    base_url: String,
    page_limit: u32,
}

impl HttpListingFetcher {
    /// Build a fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_limit: config.page_limit,
        })
    }

    fn listing_url(
        &self,
        sort: ListingType,
        after: Option<&str>,
        path: &str,
    ) -> Result<Url, url::ParseError> {
        let path = path.trim_matches('/');
        let mut url = if sort.path().is_empty() {
            Url::parse(&format!("{}/{}.json", self.base_url, path))?
        } else {
            Url::parse(&format!("{}/{}/{}.json", self.base_url, path, sort.path()))?
        };
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("raw_json", "1");
            query.append_pair("limit", &self.page_limit.to_string());
            if let Some(after) = after {
                query.append_pair("after", after);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch(
        &self,
        sort: ListingType,
        after: Option<&str>,
        token: Option<&AccessToken>,
        path: &str,
    ) -> Result<Listing, FetchError> {
        let url = self.listing_url(sort, after, path)?;
        debug!(url = %url, sort = sort.as_str(), "Fetching listing page");

        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(&token.token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, path, "Listing fetch failed");
            return Err(FetchError::Status(status));
        }

        // Decoding happens inside the request task, off the owner context.
        let body = response.bytes().await?;
        let raw: RawListing = serde_json::from_slice(&body)?;
        let listing = Listing::from(raw);
        debug!(
            links = listing.links.len(),
            after = listing.after.as_deref().unwrap_or("-"),
            "Listing page decoded"
        );
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpListingFetcher {
        let mut config = Config::for_testing();
        config.api_base_url = "https://api.example.com/".to_string();
        HttpListingFetcher::new(&config).unwrap()
    }

    #[test]
    fn test_listing_url_hot_has_no_sort_segment() {
        let url = fetcher()
            .listing_url(ListingType::Hot, None, "/r/rust/")
            .unwrap();
        assert_eq!(url.path(), "/r/rust.json");
        assert!(url.query().unwrap().contains("raw_json=1"));
        assert!(url.query().unwrap().contains("limit=25"));
        assert!(!url.query().unwrap().contains("after"));
    }

    #[test]
    fn test_listing_url_sorted_with_cursor() {
        let url = fetcher()
            .listing_url(ListingType::New, Some("t3_abc"), "r/rust")
            .unwrap();
        assert_eq!(url.path(), "/r/rust/new.json");
        assert!(url.query().unwrap().contains("after=t3_abc"));
    }
}
