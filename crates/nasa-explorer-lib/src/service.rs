//! Domain service: one operation per NASA data category.
//!
//! Every operation builds an [`UpstreamRequest`], consults the
//! [`ResponseCache`], and only on a miss calls the [`Upstream`]; successful
//! bodies are cached whole. Upstream state is never mutated.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::apod::ApodQuery;
use crate::cache::{CacheStats, ResponseCache};
use crate::config::NasaConfig;
use crate::epic::{self, EpicVariant};
use crate::error::{Error, Result};
use crate::image_library::MediaType;
use crate::rover::{PhotoSelector, Rover, RoverManifest};
use crate::upstream::{HttpUpstream, Upstream, UpstreamRequest};

const APOD_PATH: &str = "/planetary/apod";
const NEO_FEED_PATH: &str = "/neo/rest/v1/feed";
const NEO_BROWSE_PATH: &str = "/neo/rest/v1/neo/browse";
const IMAGE_SEARCH_PATH: &str = "/search";

/// Calendar dates go upstream as `YYYY-MM-DD`.
fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Cached facade over the NASA API.
///
/// Cheap to clone; clones share the upstream client and the cache.
#[derive(Clone)]
pub struct NasaService {
    upstream: Arc<dyn Upstream>,
    cache: Arc<ResponseCache>,
    base_url: String,
    api_key: String,
}

impl NasaService {
    /// Assemble a service from explicit collaborators.
    pub fn new(upstream: Arc<dyn Upstream>, cache: Arc<ResponseCache>, config: &NasaConfig) -> Self {
        Self {
            upstream,
            cache,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Production wiring: reqwest client plus a system-clock cache.
    pub fn from_config(config: &NasaConfig) -> Result<Self> {
        let upstream = Arc::new(HttpUpstream::new(config)?);
        let cache = Arc::new(ResponseCache::new(config.cache_ttl));
        Ok(Self::new(upstream, cache, config))
    }

    async fn fetch_cached(&self, request: UpstreamRequest) -> Result<Value> {
        let key = request.fingerprint();
        if let Some(body) = self.cache.get(&key) {
            debug!(endpoint = %request.path(), "cache hit");
            return Ok(body);
        }

        debug!(endpoint = %request.path(), "cache miss");
        let body = self.upstream.fetch(&request).await?;
        self.cache.set(key, body.clone());
        Ok(body)
    }

    /// Astronomy Picture of the Day in exactly one of its modes.
    pub async fn apod(&self, query: &ApodQuery) -> Result<Value> {
        let request = UpstreamRequest::new(APOD_PATH);
        let request = match *query {
            ApodQuery::Today => request,
            ApodQuery::Date(date) => request.param("date", ymd(date)),
            ApodQuery::Count(count) => request.param("count", count),
            ApodQuery::Range { start, end } => request
                .param("start_date", ymd(start))
                .param_opt("end_date", end.map(ymd)),
        };
        self.fetch_cached(request).await
    }

    /// One page of rover photos for a sol or an Earth date.
    pub async fn rover_photos(
        &self,
        rover: Rover,
        selector: PhotoSelector,
        camera: Option<&str>,
        page: u32,
    ) -> Result<Value> {
        let request =
            UpstreamRequest::new(format!("/mars-photos/api/v1/rovers/{}/photos", rover))
                .param("page", page)
                .param_opt("camera", camera);
        let request = match selector {
            PhotoSelector::Sol(sol) => request.param("sol", sol),
            PhotoSelector::EarthDate(date) => request.param("earth_date", ymd(date)),
        };
        self.fetch_cached(request).await
    }

    /// Mission manifest: max sol/date, photo totals, dates, and cameras.
    pub async fn rover_manifest(&self, rover: Rover) -> Result<RoverManifest> {
        let path = format!("/mars-photos/api/v1/rovers/{}", rover);
        let body = self.fetch_cached(UpstreamRequest::new(path.as_str())).await?;
        serde_json::from_value(body).map_err(|e| Error::Decode {
            endpoint: path,
            message: e.to_string(),
        })
    }

    /// Objects approaching between two dates. Span limits are the caller's
    /// responsibility.
    pub async fn neo_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        let request = UpstreamRequest::new(NEO_FEED_PATH)
            .param("start_date", ymd(start))
            .param("end_date", ymd(end));
        self.fetch_cached(request).await
    }

    /// A single object by its opaque identifier.
    pub async fn neo_lookup(&self, asteroid_id: &str) -> Result<Value> {
        self.fetch_cached(UpstreamRequest::new(format!("/neo/rest/v1/neo/{}", asteroid_id)))
            .await
    }

    /// Zero-based page of the full object catalogue.
    pub async fn neo_browse(&self, page: u32, size: u32) -> Result<Value> {
        let request = UpstreamRequest::new(NEO_BROWSE_PATH)
            .param("page", page)
            .param("size", size);
        self.fetch_cached(request).await
    }

    /// Free-text search of the Image and Video Library.
    pub async fn image_search(&self, query: &str, media_type: MediaType, page: u32) -> Result<Value> {
        let request = UpstreamRequest::new(IMAGE_SEARCH_PATH)
            .param("q", query)
            .param("media_type", media_type)
            .param("page", page);
        self.fetch_cached(request).await
    }

    /// Images for a date, or the list of dates with imagery when `date` is
    /// omitted.
    pub async fn epic_images(&self, date: Option<NaiveDate>, variant: EpicVariant) -> Result<Value> {
        let path = match date {
            Some(date) => format!("/EPIC/api/{}/date/{}", variant, ymd(date)),
            None => format!("/EPIC/api/{}/available", variant),
        };
        self.fetch_cached(UpstreamRequest::new(path)).await
    }

    /// Fully-qualified archive URL for one EPIC image.
    pub fn epic_image_url(&self, variant: EpicVariant, date: &str, image: &str) -> String {
        epic::image_url(&self.base_url, &self.api_key, variant, date, image)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.flush_all();
    }

    /// Drop expired cache entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }
}

impl std::fmt::Debug for NasaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NasaService")
            .field("base_url", &self.base_url)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
