//! Consumer of the directory HTTP API that backs the site's navigation and
//! browse pages. The service is external; this crate only fetches and
//! decodes its listing endpoints.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::domain::{CityListing, StateListing};
use tracing::error;

/// Listing endpoints exposed by the directory service.
///
/// Every call resolves to the full decoded listing or an error; callers that
/// want the page's silent-degradation behavior go through [`load_states`] /
/// [`load_cities`] instead of the trait directly.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Top states by business count, as served for the navigation dropdown.
    async fn top_states(&self) -> Result<Vec<StateListing>>;
    /// Top cities by business count, as served for the navigation dropdown.
    async fn top_cities(&self) -> Result<Vec<CityListing>>;
    /// Every state known to the directory.
    async fn states(&self) -> Result<Vec<StateListing>>;
    /// Cities within one state, addressed by the state's slug.
    async fn cities_in_state(&self, state_slug: &str) -> Result<Vec<CityListing>>;
}

/// Null object for hosts constructed without a directory backend.
pub struct MissingDirectoryApi;

#[async_trait]
impl DirectoryApi for MissingDirectoryApi {
    async fn top_states(&self) -> Result<Vec<StateListing>> {
        Err(anyhow!("directory api is unavailable"))
    }

    async fn top_cities(&self) -> Result<Vec<CityListing>> {
        Err(anyhow!("directory api is unavailable"))
    }

    async fn states(&self) -> Result<Vec<StateListing>> {
        Err(anyhow!("directory api is unavailable"))
    }

    async fn cities_in_state(&self, state_slug: &str) -> Result<Vec<CityListing>> {
        Err(anyhow!(
            "directory api is unavailable for state {state_slug}"
        ))
    }
}

/// reqwest-backed directory client.
pub struct HttpDirectoryApi {
    http: Client,
    base_url: String,
}

impl HttpDirectoryApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    async fn fetch_listing<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        self.http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("invalid listing payload from {path}"))
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn top_states(&self) -> Result<Vec<StateListing>> {
        self.fetch_listing("/api/top-states").await
    }

    async fn top_cities(&self) -> Result<Vec<CityListing>> {
        self.fetch_listing("/api/top-cities").await
    }

    async fn states(&self) -> Result<Vec<StateListing>> {
        self.fetch_listing("/api/states").await
    }

    async fn cities_in_state(&self, state_slug: &str) -> Result<Vec<CityListing>> {
        self.fetch_listing(&format!("/api/cities/{state_slug}")).await
    }
}

/// Fetches the full state listing, degrading to an empty list on failure.
pub async fn load_states(api: &dyn DirectoryApi) -> Vec<StateListing> {
    match api.states().await {
        Ok(states) => states,
        Err(err) => {
            error!("directory: failed to load states: {err}");
            Vec::new()
        }
    }
}

/// Fetches one state's cities, degrading to an empty list on failure.
pub async fn load_cities(api: &dyn DirectoryApi, state_slug: &str) -> Vec<CityListing> {
    match api.cities_in_state(state_slug).await {
        Ok(cities) => cities,
        Err(err) => {
            error!("directory: failed to load cities for {state_slug}: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
