use async_trait::async_trait;
use chrono::Utc;
use ego_tree::{NodeRef, iter::Edge};
use regex::Regex;
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;
use tracing::instrument;
use url::Url;

use crate::adapters::{
    ContentAdapter, ExtractError, ExtractedContent,
    client::{FAVICON_TIMEOUT, MAX_BODY_SIZE, http_client},
    origin_favicon,
};
use crate::sources::{self, Platform};

const TITLE_PLACEHOLDER: &str = "No Title Found";

/// Elements whose entire subtree is boilerplate, skipped wholesale.
const STRIPPED: &[&str] = &[
    "script", "style", "meta", "link", "nav", "footer", "header", "aside", "form", "button", "a",
    "noscript",
];

/// Elements whose direct text is page content.
const VISIBLE_CONTAINERS: &[&str] = &[
    "body", "div", "p", "article", "main", "section", "span", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Inline formatting wrappers looked through when locating the element that
/// contains a text node, so `<p>Hello <b>World</b></p>` yields both words.
const TRANSPARENT_INLINE: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "small", "mark", "sub", "sup", "code", "abbr", "time", "q",
    "cite",
];

// Parser artifacts sometimes leave a bare "html" token in the text.
static HTML_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhtml\b").unwrap());

/// Generic fallback for anything that is not a recognized platform: fetch
/// the page, walk the DOM for human-visible text.
#[derive(Debug, Default)]
pub struct WebAdapter;

impl WebAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentAdapter for WebAdapter {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn extract(&self, url: &Url) -> Result<ExtractedContent, ExtractError> {
        let response = http_client()
            .get(url.clone())
            .send()
            .await
            .map_err(ExtractError::from_reqwest_error)?
            .error_for_status()
            .map_err(ExtractError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(ExtractError::BodyTooLarge(content_length));
        }

        let body = response
            .text()
            .await
            .map_err(ExtractError::from_reqwest_error)?;

        // Check body size after download (in case Content-Length was missing)
        if body.len() as u64 > MAX_BODY_SIZE {
            return Err(ExtractError::BodyTooLarge(body.len() as u64));
        }

        // Html is not Send; parse in a block so it is gone before the
        // favicon probe awaits.
        let (title, raw_text, icon_href) = {
            let document = Html::parse_document(&body);
            (
                page_title(&document),
                visible_text(&document),
                icon_link_href(&document),
            )
        };

        let favicon_url = resolve_favicon(url, icon_href).await;

        Ok(ExtractedContent {
            title,
            raw_text,
            site_name: sources::site_name(url),
            favicon_url: Some(favicon_url),
            platform: Platform::Web,
            fetched_at: Utc::now(),
        })
    }
}

fn page_title(document: &Html) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string())
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string())
}

/// Collects the text a reader would actually see, in document order.
fn visible_text(document: &Html) -> String {
    let mut chunks: Vec<&str> = Vec::new();
    collect_visible(document.tree.root(), &mut chunks);

    let joined = chunks.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_artifacts = HTML_TOKEN_REGEX.replace_all(&collapsed, "");
    without_artifacts
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Depth-first over the edge iterator, so nesting depth never turns into
/// call stack depth. A counter tracks how many stripped subtrees enclose
/// the current node.
fn collect_visible<'a>(root: NodeRef<'a, Node>, out: &mut Vec<&'a str>) {
    let mut stripped_depth = 0usize;
    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) if STRIPPED.contains(&element.name()) => {
                    stripped_depth += 1;
                }
                Node::Text(text) if stripped_depth == 0 => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() && is_visible(node) {
                        out.push(trimmed);
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(element) = node.value()
                    && STRIPPED.contains(&element.name())
                {
                    stripped_depth -= 1;
                }
            }
        }
    }
}

/// A text node counts as visible when its containing element, after looking
/// through inline formatting wrappers, is a content container. Text directly
/// under the document root also counts.
fn is_visible(text_node: NodeRef<'_, Node>) -> bool {
    let mut current = text_node.parent();
    while let Some(node) = current {
        match node.value() {
            Node::Element(element) => {
                let name = element.name();
                if TRANSPARENT_INLINE.contains(&name) {
                    current = node.parent();
                    continue;
                }
                return VISIBLE_CONTAINERS.contains(&name);
            }
            Node::Document | Node::Fragment => return true,
            _ => return false,
        }
    }
    false
}

/// First `<link rel>` whose rel is `icon` or `shortcut icon`, any case.
fn icon_link_href(document: &Html) -> Option<String> {
    let selector = Selector::parse("link[rel]").ok()?;
    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("rel")
                .is_some_and(|rel| matches!(rel.to_lowercase().as_str(), "icon" | "shortcut icon"))
        })
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string)
}

/// Probes `<origin>/favicon.ico` first; a declared icon link is the
/// fallback, and the conventional location is assumed when neither works.
async fn resolve_favicon(url: &Url, icon_href: Option<String>) -> String {
    let default_icon = origin_favicon(url);

    let probe = http_client()
        .head(&default_icon)
        .timeout(FAVICON_TIMEOUT)
        .send()
        .await;
    if let Ok(response) = probe
        && response.status() == reqwest::StatusCode::OK
    {
        return default_icon;
    }

    if let Some(href) = icon_href {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href;
        }
        return format!(
            "{}/{}",
            url.origin().ascii_serialization(),
            href.trim_start_matches('/')
        );
    }

    default_icon
}
