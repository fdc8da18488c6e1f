use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Browser User-Agent sent on every page fetch. Several popular sites serve
/// bot-scented clients a consent wall or an empty shell instead of content.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Largest page body an adapter will download and parse.
pub const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB

/// Timeout for fetching a page body.
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for probing a favicon; failing fast here keeps it from
/// dominating the request.
pub const FAVICON_TIMEOUT: Duration = Duration::from_secs(2);

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(PAGE_TIMEOUT)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("Failed to build HTTP client")
});

/// Shared client for all adapters. Reusing one client pools connections
/// across requests.
pub fn http_client() -> &'static Client {
    &HTTP_CLIENT
}
