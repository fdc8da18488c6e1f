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

const TWITTER_API_BASE: &str = "https://api.twitter.com";

/// Tweets have no separate title; a short prefix of the text stands in.
const TITLE_WORDS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct Tweet {
    pub text: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TweetProvider: Send + Sync {
    async fn tweet(&self, tweet_id: &str) -> Result<Tweet, ExtractError>;
}

/// Twitter API v2 single-tweet lookup, bearer-token authenticated.
pub struct TwitterApi {
    bearer_token: Option<String>,
    base_url: String,
}

impl TwitterApi {
    pub fn new(bearer_token: Option<String>) -> Self {
        Self {
            bearer_token,
            base_url: TWITTER_API_BASE.to_string(),
        }
    }

    /// Point the provider at a different host (tests).
    pub fn with_base_url(bearer_token: Option<String>, base_url: String) -> Self {
        Self {
            bearer_token,
            base_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: Option<TweetData>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TweetProvider for TwitterApi {
    async fn tweet(&self, tweet_id: &str) -> Result<Tweet, ExtractError> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or(ExtractError::MissingCredentials(
                config::ENV_TWITTER_BEARER_TOKEN,
            ))?;

        let endpoint = format!("{}/2/tweets/{}", self.base_url, tweet_id);

        let response = http_client()
            .get(&endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ExtractError::from_reqwest_error)?
            .error_for_status()
            .map_err(ExtractError::from_reqwest_error)?;

        let body: TweetResponse = response
            .json()
            .await
            .map_err(ExtractError::from_reqwest_error)?;

        let data = body.data.ok_or(ExtractError::MissingField("data"))?;
        Ok(Tweet { text: data.text })
    }
}

/// A tweet URL carries its ID as the last path segment, directly after a
/// `status` segment: `x.com/<user>/status/<digits>`.
pub(crate) fn tweet_id(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.len() < 3 || segments[segments.len() - 2] != "status" {
        return None;
    }

    let id = segments[segments.len() - 1];
    id.chars()
        .all(|c| c.is_ascii_digit())
        .then(|| id.to_string())
}

/// First words of the tweet, ellipsis-suffixed when text continues.
fn title_from_text(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > TITLE_WORDS {
        format!("{}...", words[..TITLE_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

pub struct TwitterAdapter {
    provider: Arc<dyn TweetProvider>,
}

impl TwitterAdapter {
    pub fn new(provider: Arc<dyn TweetProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ContentAdapter for TwitterAdapter {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn extract(&self, url: &Url) -> Result<ExtractedContent, ExtractError> {
        let id = tweet_id(url).ok_or_else(|| ExtractError::UnsupportedUrl(url.to_string()))?;
        let tweet = self.provider.tweet(&id).await?;

        Ok(ExtractedContent {
            title: title_from_text(&tweet.text),
            raw_text: tweet.text,
            site_name: sources::site_name(url),
            favicon_url: Some(origin_favicon(url)),
            platform: Platform::Twitter,
            fetched_at: Utc::now(),
        })
    }
}
