pub mod client;
pub mod errors;
pub mod reddit;
pub mod twitter;
pub mod web;
pub mod youtube;

pub use client::http_client;
pub use errors::ExtractError;
pub use reddit::RedditAdapter;
pub use twitter::TwitterAdapter;
pub use web::WebAdapter;
pub use youtube::YouTubeAdapter;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::sources::Platform;

/// Everything an adapter learns about one URL. Built exactly once per
/// extraction and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    /// Unprocessed text as the source supplied it; normalization happens
    /// downstream.
    pub raw_text: String,
    pub site_name: String,
    pub favicon_url: Option<String>,
    pub platform: Platform,
    pub fetched_at: DateTime<Utc>,
}

/// One implementation per supported source. The caller has already matched
/// the URL to this adapter's platform; `extract` still validates that the
/// URL carries a usable content identifier.
#[async_trait]
pub trait ContentAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    async fn extract(&self, url: &Url) -> Result<ExtractedContent, ExtractError>;
}

/// Conventional favicon location for the URL's origin. API-backed adapters
/// use this directly; the web adapter probes it before falling back to
/// `<link rel="icon">`.
pub(crate) fn origin_favicon(url: &Url) -> String {
    format!("{}/favicon.ico", url.origin().ascii_serialization())
}
