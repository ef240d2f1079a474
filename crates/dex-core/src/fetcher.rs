use crate::config::ApiConfig;
use crate::{DetailRecord, DetailResponse, Error, ItemId, ListResponse, Page, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fixed number of items per list page.
pub const PAGE_SIZE: usize = 20;

/// Public PokeAPI root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Remote gateway for the list and detail endpoints.
///
/// Every stateful component takes the gateway as `Arc<dyn CatalogApi>` so tests
/// can substitute a scripted implementation.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches the list page at `page_index` (offset = `page_index * PAGE_SIZE`).
    async fn fetch_page(&self, page_index: usize) -> Result<Page>;

    /// Fetches the detail record behind a resource URL.
    async fn fetch_detail(&self, url: &str) -> Result<DetailRecord>;
}

/// HTTP client for the catalog API
pub struct Fetcher {
    client: Client,
    base_url: Url,
}

impl Fetcher {
    /// Creates a fetcher for the public API with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a fetcher against another API root (mirrors, tests)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, Duration::from_secs(30))
    }

    /// Creates a fetcher from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::with_options(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Creates a fetcher with an explicit API root and request timeout
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!(
                "'{base_url}' cannot be used as an API root"
            )));
        }
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dex/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self { client, base_url })
    }

    /// The normalized API root (always ends with `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the list page at `page_index`.
    pub fn page_url(&self, page_index: usize) -> Result<Url> {
        let mut url = self.base_url.join("pokemon")?;
        let offset = page_index.saturating_mul(PAGE_SIZE);
        url.query_pairs_mut()
            .append_pair("limit", &PAGE_SIZE.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    /// Resource URL of a single item, addressed by id (`25`, `#025`) or name.
    pub fn item_url(&self, key: &str) -> Result<String> {
        let key = match key.parse::<ItemId>() {
            Ok(id) => id.to_string(),
            Err(_) => key.trim().to_lowercase(),
        };
        if key.is_empty() || key.contains('/') {
            return Err(Error::InvalidId(key));
        }
        Ok(self.base_url.join(&format!("pokemon/{key}/"))?.to_string())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("Resource not found at '{url}'")));
        }
        if let Err(err) = response.error_for_status_ref() {
            return Err(Error::Network(err));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::Decode(format!("{url}: {e}")))
    }
}

#[async_trait]
impl CatalogApi for Fetcher {
    async fn fetch_page(&self, page_index: usize) -> Result<Page> {
        let url = self.page_url(page_index)?;
        let response: ListResponse = self.get_json(url.as_str()).await?;
        info!(
            "Fetched page {} ({} items, more: {})",
            page_index,
            response.results.len(),
            response.next.is_some()
        );
        Ok(response.into_page(page_index))
    }

    async fn fetch_detail(&self, url: &str) -> Result<DetailRecord> {
        let response: DetailResponse = self.get_json(url).await?;
        // Name-addressed URLs carry no numeric segment; fall back to the payload id
        let id = match ItemId::from_url(url) {
            Ok(id) => id,
            Err(err) => response.id.map(ItemId::new).ok_or(err)?,
        };
        debug!("Fetched detail for {}", id);
        Ok(response.into_record(id))
    }
}
