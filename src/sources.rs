//! Source resolution: which platform owns a URL.
//!
//! Resolution is pure hostname matching and never fails; hosts that match no
//! known platform fall through to [`Platform::Web`], deferring any real
//! failure to the adapter that actually touches the network.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use url::Url;

/// The supported content sources. Decided once per request and carried on
/// the extracted content unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Reddit,
    Twitter,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Reddit => "reddit",
            Platform::Twitter => "twitter",
            Platform::Web => "web",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const YOUTUBE_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];
const REDDIT_HOSTS: [&str; 2] = ["reddit.com", "redd.it"];
const TWITTER_HOSTS: [&str; 2] = ["twitter.com", "x.com"];

/// Map a URL to the platform whose adapter should handle it.
pub fn resolve(url: &Url) -> Platform {
    let Some(host) = url.host_str() else {
        return Platform::Web;
    };
    let host = host.to_ascii_lowercase();

    if matches_any(&host, &YOUTUBE_HOSTS) {
        Platform::YouTube
    } else if matches_any(&host, &REDDIT_HOSTS) {
        Platform::Reddit
    } else if matches_any(&host, &TWITTER_HOSTS) {
        Platform::Twitter
    } else {
        Platform::Web
    }
}

// Suffix match only: "www.youtube.com" counts, "youtube.com.evil.example"
// does not.
fn matches_any(host: &str, domains: &[&str]) -> bool {
    domains.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Human-readable site name for a URL: the hostname with any leading `www.`
/// and any port stripped.
pub fn site_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.to_string()
}
