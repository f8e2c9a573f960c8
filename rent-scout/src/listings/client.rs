//! Listing service HTTP client.
//!
//! Issues search, lookup and by-ids requests against the remote listing
//! service and converts responses into domain types. LIST-view searches are
//! paginated by the service; `search` drives the cursor until the full
//! result set (up to the service cap) has been aggregated.
//!
//! The client keeps no state between calls and performs no retries of its
//! own; wrap it with [`crate::retry::Retrying`] for a retry policy.

use std::future::Future;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::Listing;

use super::error::ListingError;
use super::query::{Channel, SearchQuery, ViewType};
use super::types::{
    ByIdsPage, ListingPin, LocationMatch, LookupPage, MapPage, PropertyDto, SearchPage,
    parse_result_count,
};

/// Maximum results the LIST view will page through.
pub const LIST_RESULT_CAP: u32 = 1000;

/// Maximum results the MAP view returns in its single response.
pub const MAP_RESULT_CAP: u32 = 499;

/// Maximum ids accepted by a single by-ids fetch.
pub const BY_IDS_CAP: usize = 25;

/// Default (and maximum) match count for the typeahead lookup.
pub const LOOKUP_LIMIT: u32 = 20;

/// Default base URL for search and by-ids endpoints.
const DEFAULT_SEARCH_BASE_URL: &str = "https://www.rightmove.co.uk";

/// Default base URL for the location lookup service.
const DEFAULT_LOOKUP_BASE_URL: &str = "https://los.rightmove.co.uk";

/// Seam over the listing search, letting the discovery pipeline run against
/// the real client, a retry-wrapped client or a test double.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Search listings, aggregating every page up to the service cap.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, ListingError>;
}

/// Configuration for the listing client.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Base URL for search and by-ids endpoints.
    pub search_base_url: String,
    /// Base URL for the typeahead lookup service.
    pub lookup_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ListingConfig {
    /// Create a config with the production hosts.
    pub fn new() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom search base URL (for testing).
    pub fn with_search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_base_url = url.into();
        self
    }

    /// Set a custom lookup base URL (for testing).
    pub fn with_lookup_base_url(mut self, url: impl Into<String>) -> Self {
        self.lookup_base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Listing service client.
#[derive(Debug, Clone)]
pub struct ListingClient {
    http: reqwest::Client,
    search_base_url: String,
    lookup_base_url: String,
}

impl ListingClient {
    /// Create a new client with the given configuration.
    ///
    /// Responses are requested gzip-compressed and decompressed
    /// transparently.
    pub fn new(config: ListingConfig) -> Result<Self, ListingError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rent-scout/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            search_base_url: config.search_base_url,
            lookup_base_url: config.lookup_base_url,
        })
    }

    /// Search listings via the LIST view, following pagination until the
    /// accumulated count reaches `min(resultCount, LIST_RESULT_CAP)`.
    ///
    /// Arrival order is preserved across pages.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, ListingError> {
        let url = format!("{}/api/_search", self.search_base_url);
        let properties = aggregate_list_pages(|index| {
            self.get_json::<SearchPage>(&url, query.params(ViewType::List, index))
        })
        .await?;
        tracing::debug!(count = properties.len(), "listing search aggregated");
        Ok(properties.into_iter().map(Listing::from).collect())
    }

    /// Search via the MAP view: one request, coordinate pins only, capped at
    /// [`MAP_RESULT_CAP`] results. Returns the pins and the reported total
    /// match count.
    pub async fn map_search(
        &self,
        query: &SearchQuery,
    ) -> Result<(Vec<ListingPin>, u32), ListingError> {
        let url = format!("{}/api/_mapSearch", self.search_base_url);
        let page: MapPage = self
            .get_json(&url, query.params(ViewType::Map, None))
            .await?;
        let total = parse_result_count(&page.result_count)?;
        let pins = page.properties.into_iter().map(ListingPin::from).collect();
        Ok((pins, total))
    }

    /// Look up location identifiers matching a free-text query.
    ///
    /// `limit` defaults to the service maximum of [`LOOKUP_LIMIT`].
    pub async fn lookup(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<LocationMatch>, ListingError> {
        let url = format!("{}/typeahead", self.lookup_base_url);
        let params = vec![
            ("query", query.to_string()),
            ("limit", limit.unwrap_or(LOOKUP_LIMIT).to_string()),
            ("exclude", String::new()),
        ];
        let page: LookupPage = self.get_json(&url, params).await?;
        Ok(page.matches)
    }

    /// Fetch listings by id. The service accepts at most [`BY_IDS_CAP`] ids
    /// per request and silently ignores the rest.
    pub async fn search_by_ids(
        &self,
        ids: &[u64],
        channel: Channel,
    ) -> Result<Vec<Listing>, ListingError> {
        let url = format!("{}/api/_searchByIds", self.search_base_url);
        let joined = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let params = vec![
            ("channel", channel.as_str().to_string()),
            ("propertyIds", joined),
            ("viewType", ViewType::Map.as_str().to_string()),
        ];
        let page: ByIdsPage = self.get_json(&url, params).await?;
        Ok(page.properties.into_iter().map(Listing::from).collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, ListingError> {
        let response = self.http.get(url).query(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ListingError::Json {
            message: format!("{e} (body: {})", body.chars().take(200).collect::<String>()),
        })
    }
}

#[async_trait]
impl ListingSource for ListingClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, ListingError> {
        ListingClient::search(self, query).await
    }
}

/// Absolute URL of a listing's detail page.
pub fn detail_url(detail_path: &str) -> String {
    format!("{DEFAULT_SEARCH_BASE_URL}{detail_path}")
}

/// Drive LIST-view pagination.
///
/// Calls `fetch` with `None` for the first page, then with the cursor taken
/// from each response's pagination block, until the accumulated count
/// reaches `min(resultCount, LIST_RESULT_CAP)`. The reported total is
/// re-read from the most recent response each round.
async fn aggregate_list_pages<F, Fut>(mut fetch: F) -> Result<Vec<PropertyDto>, ListingError>
where
    F: FnMut(Option<u32>) -> Fut,
    Fut: Future<Output = Result<SearchPage, ListingError>>,
{
    let mut page = fetch(None).await?;
    let mut properties = std::mem::take(&mut page.properties);

    loop {
        let total = parse_result_count(&page.result_count)?;
        if properties.len() as u32 >= total.min(LIST_RESULT_CAP) {
            return Ok(properties);
        }

        let cursor = page
            .pagination
            .as_ref()
            .and_then(|pagination| pagination.next.as_deref())
            .ok_or_else(|| ListingError::Json {
                message: "response promised more results but carried no pagination cursor"
                    .to_string(),
            })?;
        let cursor: u32 = cursor.parse().map_err(|_| ListingError::Json {
            message: format!("unparseable pagination cursor: {cursor:?}"),
        })?;

        page = fetch(Some(cursor)).await?;
        properties.append(&mut page.properties);
    }
}
