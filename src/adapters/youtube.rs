use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use url::Url;

use crate::adapters::{
    ContentAdapter, ExtractError, ExtractedContent, client::http_client, origin_favicon,
};
use crate::config;
use crate::sources::{self, Platform};

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Debug, Clone, Default)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoMetadataProvider: Send + Sync {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, ExtractError>;
}

/// YouTube Data API v3 `videos` endpoint, `part=snippet`.
pub struct YouTubeDataApi {
    api_key: Option<String>,
    endpoint: String,
}

impl YouTubeDataApi {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            endpoint: VIDEOS_ENDPOINT.to_string(),
        }
    }

    /// Point the provider at a different endpoint (tests).
    pub fn with_endpoint(api_key: Option<String>, endpoint: String) -> Self {
        Self { api_key, endpoint }
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[async_trait]
impl VideoMetadataProvider for YouTubeDataApi {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, ExtractError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ExtractError::MissingCredentials(
                config::ENV_YOUTUBE_API_KEY,
            ))?;

        let response = http_client()
            .get(&self.endpoint)
            .query(&[("part", "snippet"), ("id", video_id), ("key", api_key)])
            .send()
            .await
            .map_err(ExtractError::from_reqwest_error)?
            .error_for_status()
            .map_err(ExtractError::from_reqwest_error)?;

        let body: VideoListResponse = response
            .json()
            .await
            .map_err(ExtractError::from_reqwest_error)?;

        let item = body
            .items
            .into_iter()
            .next()
            .ok_or(ExtractError::MissingField("items"))?;

        Ok(VideoMetadata {
            title: item.snippet.title,
            description: item.snippet.description,
            tags: item.snippet.tags,
        })
    }
}

/// Pulls the video ID out of the three supported URL shapes:
/// `youtu.be/<id>`, `/watch?v=<id>` and `/embed/<id>`.
pub(crate) fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if host == "youtu.be" {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    if url.path().starts_with("/embed/") {
        return url
            .path_segments()
            .and_then(|mut segments| segments.nth(1))
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    if url.path().starts_with("/watch") {
        return url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty());
    }

    None
}

pub struct YouTubeAdapter {
    provider: Arc<dyn VideoMetadataProvider>,
}

impl YouTubeAdapter {
    pub fn new(provider: Arc<dyn VideoMetadataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ContentAdapter for YouTubeAdapter {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn extract(&self, url: &Url) -> Result<ExtractedContent, ExtractError> {
        let id = video_id(url).ok_or_else(|| ExtractError::UnsupportedUrl(url.to_string()))?;
        let metadata = self.provider.video_metadata(&id).await?;

        let raw_text = [
            metadata.title.as_str(),
            metadata.description.as_str(),
            metadata.tags.join(" ").as_str(),
        ]
        .join(" ")
        .trim()
        .to_string();

        Ok(ExtractedContent {
            title: metadata.title,
            raw_text,
            site_name: sources::site_name(url),
            favicon_url: Some(origin_favicon(url)),
            platform: Platform::YouTube,
            fetched_at: Utc::now(),
        })
    }
}
