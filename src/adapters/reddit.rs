use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use url::Url;

use crate::adapters::{
    ContentAdapter, ExtractError, ExtractedContent, client::http_client, origin_favicon,
};
use crate::sources::{self, Platform};

const REDDIT_BASE: &str = "https://www.reddit.com";

/// Reddit asks API clients for a unique, descriptive User-Agent and rate
/// limits generic browser strings, so the shared client default is
/// overridden here.
pub const REDDIT_USER_AGENT: &str = "shelfmark/0.1 (+https://shelfmark.example.com)";

#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub title: String,
    pub selftext: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionProvider: Send + Sync {
    async fn submission(&self, post_id: &str) -> Result<Submission, ExtractError>;
}

/// Unauthenticated Reddit JSON endpoint: `GET /comments/<id>.json` returns
/// two listings, the first of which holds the submission itself.
pub struct RedditJsonApi {
    base_url: String,
}

impl RedditJsonApi {
    pub fn new() -> Self {
        Self {
            base_url: REDDIT_BASE.to_string(),
        }
    }

    /// Point the provider at a different host (tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }
}

impl Default for RedditJsonApi {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: SubmissionData,
}

#[derive(Debug, Deserialize)]
struct SubmissionData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
}

#[async_trait]
impl SubmissionProvider for RedditJsonApi {
    async fn submission(&self, post_id: &str) -> Result<Submission, ExtractError> {
        let endpoint = format!("{}/comments/{}.json", self.base_url, post_id);

        let response = http_client()
            .get(&endpoint)
            .header(reqwest::header::USER_AGENT, REDDIT_USER_AGENT)
            .send()
            .await
            .map_err(ExtractError::from_reqwest_error)?
            .error_for_status()
            .map_err(ExtractError::from_reqwest_error)?;

        let listings: Vec<Listing> = response
            .json()
            .await
            .map_err(ExtractError::from_reqwest_error)?;

        let submission = listings
            .into_iter()
            .next()
            .and_then(|listing| listing.data.children.into_iter().next())
            .ok_or(ExtractError::MissingField("children"))?;

        Ok(Submission {
            title: submission.data.title,
            selftext: submission.data.selftext,
        })
    }
}

/// Pulls the post ID out of `redd.it/<id>` short links or the segment
/// following `comments` in a full permalink.
pub(crate) fn post_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if host == "redd.it" || host.ends_with(".redd.it") {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    let comments = segments.iter().position(|segment| *segment == "comments")?;
    segments
        .get(comments + 1)
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
}

pub struct RedditAdapter {
    provider: Arc<dyn SubmissionProvider>,
}

impl RedditAdapter {
    pub fn new(provider: Arc<dyn SubmissionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ContentAdapter for RedditAdapter {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn extract(&self, url: &Url) -> Result<ExtractedContent, ExtractError> {
        let id = post_id(url).ok_or_else(|| ExtractError::UnsupportedUrl(url.to_string()))?;
        let submission = self.provider.submission(&id).await?;

        let raw_text = [submission.title.as_str(), submission.selftext.as_str()]
            .join(" ")
            .trim()
            .to_string();

        Ok(ExtractedContent {
            title: submission.title,
            raw_text,
            site_name: sources::site_name(url),
            favicon_url: Some(origin_favicon(url)),
            platform: Platform::Reddit,
            fetched_at: Utc::now(),
        })
    }
}
