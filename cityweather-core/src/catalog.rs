use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::FetchError,
    model::{CityRecord, Coordinates},
};

/// Fixed window size for every catalog request.
pub const PAGE_SIZE: u64 = 20;

/// Public geonames dataset (cities with a population above 1000).
pub const DEFAULT_CATALOG_URL: &str = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/geonames-all-cities-with-a-population-1000";

/// A paginated source of city records.
#[async_trait]
pub trait CityCatalog: Send + Sync + Debug {
    /// Fetch one window of records starting at `offset`, in catalog order.
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<CityRecord>, FetchError>;
}

/// Catalog client for the opendatasoft Explore v2.1 records endpoint.
#[derive(Debug, Clone)]
pub struct OpendatasoftCatalog {
    base_url: String,
    http: Client,
}

impl OpendatasoftCatalog {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_CATALOG_URL.to_string())
    }

    /// Point the client at a different dataset root (config override, tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

impl Default for OpendatasoftCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CityCatalog for OpendatasoftCatalog {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<CityRecord>, FetchError> {
        let url = format!("{}/records", self.base_url);

        tracing::debug!(offset, limit, "fetching city catalog page");

        let res = self
            .http
            .get(&url)
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
            .send()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("city catalog request failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("failed to read catalog body: {e}")))?;

        if !status.is_success() {
            return Err(FetchError::from_status(status, &body));
        }

        let parsed: RecordsResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(format!("city catalog JSON: {e}")))?;

        Ok(parsed.results.into_iter().map(CityRecord::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    results: Vec<OdsCity>,
}

#[derive(Debug, Deserialize)]
struct OdsCity {
    name: String,
    cou_name_en: String,
    // Sparse in the dataset for a handful of rows.
    #[serde(default)]
    population: u64,
    #[serde(default)]
    timezone: String,
    geoname_id: String,
    coordinates: OdsPoint,
}

#[derive(Debug, Deserialize)]
struct OdsPoint {
    lat: f64,
    lon: f64,
}

impl From<OdsCity> for CityRecord {
    fn from(c: OdsCity) -> Self {
        CityRecord {
            name: c.name,
            country: c.cou_name_en,
            population: c.population,
            timezone: c.timezone,
            geoname_id: c.geoname_id,
            coordinates: Coordinates { lat: c.coordinates.lat, lon: c.coordinates.lon },
        }
    }
}
