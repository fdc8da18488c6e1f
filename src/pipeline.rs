use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::adapters::{
    ContentAdapter, ExtractError, ExtractedContent, RedditAdapter, TwitterAdapter, WebAdapter,
    YouTubeAdapter, reddit::RedditJsonApi, twitter::TwitterApi, youtube::YouTubeDataApi,
};
use crate::classifier::{Category, CategoryModel, ClassifyError};
use crate::config::Config;
use crate::normalize::{NormalizedText, normalize};
use crate::sources::{self, Platform};
use crate::tags::{self, DEFAULT_TOP_N};

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The URL did not parse, or it matched a platform without carrying a
    /// content identifier.
    #[error("unsupported url: {0}")]
    UnsupportedUrl(String),

    #[error("extraction failed for {platform}: {source}")]
    Extraction {
        platform: Platform,
        source: ExtractError,
    },

    /// Extraction succeeded but nothing was left after normalization.
    #[error("no text content after normalization")]
    EmptyContent,

    #[error("classification failed: {0}")]
    Classification(#[from] ClassifyError),
}

/// Terminal success value of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub content: ExtractedContent,
    pub normalized_text: NormalizedText,
    pub category: Category,
    pub tags: Vec<String>,
}

/// Sequences resolve, extract, normalize, classify and tag for one URL.
/// Every stage short-circuits on failure except tag extraction, which
/// degrades to an empty list.
pub struct Analyzer {
    model: Arc<CategoryModel>,
    youtube: YouTubeAdapter,
    reddit: RedditAdapter,
    twitter: TwitterAdapter,
    web: WebAdapter,
    top_n: usize,
}

impl Analyzer {
    pub fn new(
        model: Arc<CategoryModel>,
        youtube: YouTubeAdapter,
        reddit: RedditAdapter,
        twitter: TwitterAdapter,
        web: WebAdapter,
    ) -> Self {
        Self {
            model,
            youtube,
            reddit,
            twitter,
            web,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Wires the HTTP-backed providers from configuration.
    pub fn from_config(config: &Config, model: Arc<CategoryModel>) -> Self {
        let youtube = YouTubeAdapter::new(Arc::new(YouTubeDataApi::new(
            config.youtube_api_key().map(str::to_string),
        )));
        let reddit = RedditAdapter::new(Arc::new(RedditJsonApi::new()));
        let twitter = TwitterAdapter::new(Arc::new(TwitterApi::new(
            config.twitter_bearer_token().map(str::to_string),
        )));
        Self::new(model, youtube, reddit, twitter, WebAdapter::new())
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// The single place where a platform picks its adapter; nothing
    /// downstream branches on platform again.
    fn adapter_for(&self, platform: Platform) -> &dyn ContentAdapter {
        match platform {
            Platform::YouTube => &self.youtube,
            Platform::Reddit => &self.reddit,
            Platform::Twitter => &self.twitter,
            Platform::Web => &self.web,
        }
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn analyze(&self, url: &str) -> Result<Analysis, PipelineError> {
        let parsed =
            Url::parse(url).map_err(|_| PipelineError::UnsupportedUrl(url.to_string()))?;
        let platform = sources::resolve(&parsed);
        debug!(%platform, "resolved platform");

        let content = self
            .adapter_for(platform)
            .extract(&parsed)
            .await
            .map_err(|source| match source {
                ExtractError::UnsupportedUrl(url) => PipelineError::UnsupportedUrl(url),
                source => PipelineError::Extraction { platform, source },
            })?;
        debug!(
            title = %content.title,
            chars = content.raw_text.len(),
            "extracted content"
        );

        let normalized_text = normalize(&content.raw_text);
        if normalized_text.is_empty() {
            return Err(PipelineError::EmptyContent);
        }

        let category = self.model.classify(&normalized_text)?;
        let tags = tags::extract_tags(self.model.vectorizer(), &normalized_text, self.top_n);
        debug!(%category, tags = tags.len(), "classified content");

        Ok(Analysis {
            content,
            normalized_text,
            category,
            tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::reddit::MockSubmissionProvider;
    use crate::adapters::twitter::{MockTweetProvider, Tweet};
    use crate::adapters::youtube::{MockVideoMetadataProvider, VideoMetadata};
    use crate::classifier::{
        ClassifierArtifact, LabelEncoder, LabelEncoderArtifact, LinearClassifier, TfidfArtifact,
        TfidfVectorizer,
    };
    use std::collections::HashMap;

    fn travel_model() -> Arc<CategoryModel> {
        let vectorizer = TfidfVectorizer::from_artifact(TfidfArtifact {
            vocabulary: HashMap::from([
                ("travel".to_string(), 0),
                ("vlog".to_string(), 1),
                ("lanka".to_string(), 2),
                ("football".to_string(), 3),
            ]),
            idf: vec![1.0, 1.2, 1.4, 1.0],
            ngram_range: (1, 1),
        })
        .unwrap();

        let labels = LabelEncoder::from_artifact(LabelEncoderArtifact {
            classes: vec!["Sports".to_string(), "Travel & Adventures".to_string()],
        })
        .unwrap();

        let classifier = LinearClassifier::from_artifact(ClassifierArtifact {
            coef: vec![vec![0.0, 0.0, 0.0, 2.0], vec![1.0, 1.0, 1.0, 0.0]],
            intercept: vec![0.0, 0.0],
        })
        .unwrap();

        Arc::new(CategoryModel::from_parts(vectorizer, labels, classifier).unwrap())
    }

    fn analyzer_with_youtube(provider: MockVideoMetadataProvider) -> Analyzer {
        Analyzer::new(
            travel_model(),
            YouTubeAdapter::new(Arc::new(provider)),
            RedditAdapter::new(Arc::new(MockSubmissionProvider::new())),
            TwitterAdapter::new(Arc::new(MockTweetProvider::new())),
            WebAdapter::new(),
        )
    }

    fn analyzer_with_twitter(provider: MockTweetProvider) -> Analyzer {
        Analyzer::new(
            travel_model(),
            YouTubeAdapter::new(Arc::new(MockVideoMetadataProvider::new())),
            RedditAdapter::new(Arc::new(MockSubmissionProvider::new())),
            TwitterAdapter::new(Arc::new(provider)),
            WebAdapter::new(),
        )
    }

    #[tokio::test]
    async fn analyze_runs_every_stage_in_order() {
        let mut provider = MockVideoMetadataProvider::new();
        provider
            .expect_video_metadata()
            .withf(|id| id == "abc123")
            .returning(|_| {
                Ok(VideoMetadata {
                    title: "Tour vlog".to_string(),
                    description: "travel in Sri Lanka!".to_string(),
                    tags: vec!["travel".to_string()],
                })
            });

        let analysis = analyzer_with_youtube(provider)
            .analyze("https://www.youtube.com/watch?v=abc123")
            .await
            .unwrap();

        assert_eq!(
            analysis.normalized_text.as_str(),
            "tour vlog travel in sri lanka travel"
        );
        assert_eq!(analysis.category, Category::TravelAdventures);
        assert_eq!(analysis.content.platform, Platform::YouTube);
        assert_eq!(analysis.content.title, "Tour vlog");
        assert!(analysis.tags.contains(&"travel".to_string()));
    }

    #[tokio::test]
    async fn analyze_rejects_unparseable_urls() {
        let analyzer = analyzer_with_youtube(MockVideoMetadataProvider::new());
        let err = analyzer.analyze("not a url").await.unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedUrl(_)));
    }

    #[tokio::test]
    async fn analyze_treats_missing_content_id_as_unsupported() {
        let analyzer = analyzer_with_youtube(MockVideoMetadataProvider::new());
        let err = analyzer
            .analyze("https://www.youtube.com/feed/subscriptions")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedUrl(_)));
    }

    #[tokio::test]
    async fn analyze_wraps_provider_failures_with_their_platform() {
        let mut provider = MockVideoMetadataProvider::new();
        provider
            .expect_video_metadata()
            .returning(|_| Err(ExtractError::Http(reqwest::StatusCode::FORBIDDEN)));

        let err = analyzer_with_youtube(provider)
            .analyze("https://youtu.be/abc123")
            .await
            .unwrap_err();

        match err {
            PipelineError::Extraction { platform, source } => {
                assert_eq!(platform, Platform::YouTube);
                assert!(matches!(source, ExtractError::Http(_)));
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_fails_when_nothing_survives_normalization() {
        let mut provider = MockTweetProvider::new();
        provider.expect_tweet().returning(|_| {
            Ok(Tweet {
                text: "🚀🚀 https://t.co/abc".to_string(),
            })
        });

        let err = analyzer_with_twitter(provider)
            .analyze("https://x.com/user/status/12345")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyContent));
    }

    #[tokio::test]
    async fn analyze_honors_a_custom_tag_limit() {
        let mut provider = MockVideoMetadataProvider::new();
        provider.expect_video_metadata().returning(|_| {
            Ok(VideoMetadata {
                title: "travel vlog".to_string(),
                description: "lanka".to_string(),
                tags: vec![],
            })
        });

        let analysis = analyzer_with_youtube(provider)
            .with_top_n(1)
            .analyze("https://youtu.be/abc123")
            .await
            .unwrap();
        assert_eq!(analysis.tags.len(), 1);
    }

    #[test]
    fn analysis_serializes_with_stable_field_names() {
        let model = travel_model();
        let normalized_text = normalize("travel vlog");
        let category = model.classify(&normalized_text).unwrap();
        let analysis = Analysis {
            content: ExtractedContent {
                title: "t".to_string(),
                raw_text: "travel vlog".to_string(),
                site_name: "youtube.com".to_string(),
                favicon_url: None,
                platform: Platform::YouTube,
                fetched_at: chrono::Utc::now(),
            },
            normalized_text,
            category,
            tags: vec!["travel".to_string()],
        };

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["category"], "Travel & Adventures");
        assert_eq!(json["normalized_text"], "travel vlog");
        assert_eq!(json["content"]["platform"], "youtube");
    }
}
