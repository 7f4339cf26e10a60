//! Sonarr API client implementation
//!
//! Implements the CatalogClient trait against Sonarr's v3 REST API, plus
//! the SeriesLister capability backing the "list all series" view.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CatalogClient, CatalogError, MediaResult, RootFolder, SeriesLister, SeriesOverview};
use crate::config::ServiceConfig;

/// Sonarr carries a language profile on every add; profile 1 is the
/// backend's built-in default
const LANGUAGE_PROFILE_ID: u64 = 1;

/// Sonarr series catalog client
#[derive(Debug)]
pub struct SonarrClient {
    base_url: String,
    api_key: String,
    quality_profile_id: u64,
    http: Client,
}

/// A search hit from `/series/lookup`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesLookup {
    title: String,
    #[serde(default)]
    year: u32,
    #[serde(default)]
    tvdb_id: u64,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Image {
    #[serde(default)]
    cover_type: String,
    #[serde(default)]
    remote_url: Option<String>,
}

/// The subset of a library entry needed for membership checks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibrarySeries {
    #[serde(default)]
    tvdb_id: u64,
}

fn poster_url(images: &[Image]) -> Option<String> {
    images
        .iter()
        .find(|i| i.cover_type == "poster")
        .and_then(|i| i.remote_url.clone())
}

impl SonarrClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, CatalogError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| CatalogError::Configuration(format!("{} not set", config.api_key_env)))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(CatalogError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            quality_profile_id: config.quality_profile_id,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        debug!(%path, "get_json: called");
        let response = self
            .http
            .get(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%path, status = status.as_u16(), "get_json: request failed");
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for SonarrClient {
    async fn search(&self, title: &str) -> Result<Vec<MediaResult>, CatalogError> {
        debug!(%title, "search: called");
        let hits: Vec<SeriesLookup> = self.get_json("/series/lookup", &[("term", title)]).await?;

        // Backend relevance order is preserved verbatim
        let results = hits
            .into_iter()
            .filter(|s| s.tvdb_id != 0)
            .map(|s| MediaResult {
                remote_id: s.tvdb_id,
                poster: poster_url(&s.images),
                title: s.title,
                year: s.year,
            })
            .collect::<Vec<_>>();

        debug!(count = results.len(), "search: done");
        Ok(results)
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, CatalogError> {
        self.get_json("/rootfolder", &[]).await
    }

    async fn in_library(&self, remote_id: u64) -> Result<bool, CatalogError> {
        let library: Vec<LibrarySeries> = self.get_json("/series", &[]).await?;
        Ok(library.iter().any(|s| s.tvdb_id == remote_id))
    }

    async fn add_to_library(&self, remote_id: u64, path: &str) -> Result<bool, CatalogError> {
        debug!(%remote_id, %path, "add_to_library: called");

        // tvdb: term lookup returns the single full series object the add
        // payload is built from
        let term = format!("tvdb:{}", remote_id);
        let mut hits: Vec<serde_json::Value> = self.get_json("/series/lookup", &[("term", term.as_str())]).await?;
        if hits.is_empty() {
            return Err(CatalogError::InvalidResponse(format!(
                "series lookup for tvdb:{} returned nothing",
                remote_id
            )));
        }
        let mut series = hits.remove(0);

        let obj = series
            .as_object_mut()
            .ok_or_else(|| CatalogError::InvalidResponse("series lookup did not return an object".to_string()))?;
        obj.insert("qualityProfileId".to_string(), self.quality_profile_id.into());
        obj.insert("languageProfileId".to_string(), LANGUAGE_PROFILE_ID.into());
        obj.insert("rootFolderPath".to_string(), path.into());
        obj.insert("monitored".to_string(), true.into());
        obj.insert(
            "addOptions".to_string(),
            serde_json::json!({ "searchForMissingEpisodes": true }),
        );

        let response = self
            .http
            .post(self.url("/series"))
            .header("X-Api-Key", &self.api_key)
            .json(&series)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(%remote_id, "add_to_library: added");
            return Ok(true);
        }

        // 400 means the backend refused the series (typically already
        // present); a rejected add, not a transport failure
        if status.as_u16() == 400 {
            warn!(%remote_id, "add_to_library: rejected by backend");
            return Ok(false);
        }

        let message = response.text().await.unwrap_or_default();
        Err(CatalogError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SeriesLister for SonarrClient {
    async fn list_series(&self) -> Result<Vec<SeriesOverview>, CatalogError> {
        self.get_json("/series", &[]).await
    }
}
