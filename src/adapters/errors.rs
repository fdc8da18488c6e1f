use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The URL matched a platform but carried no usable content identifier.
    #[error("no content identifier in url: {0}")]
    UnsupportedUrl(String),

    /// The adapter needs an API credential that is not configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("http error {0}")]
    Http(reqwest::StatusCode),

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("request timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(String),

    /// The upstream response parsed but lacked an expected field.
    #[error("missing field in response: {0}")]
    MissingField(&'static str),
}

impl ExtractError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Http(status)
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_lowercase_and_specific() {
        let err = ExtractError::UnsupportedUrl("https://youtu.be/".to_string());
        assert_eq!(
            err.to_string(),
            "no content identifier in url: https://youtu.be/"
        );

        let err = ExtractError::MissingCredentials("YOUTUBE_API_KEY");
        assert_eq!(err.to_string(), "missing credentials: YOUTUBE_API_KEY");

        let err = ExtractError::Http(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "http error 404 Not Found");

        let err = ExtractError::BodyTooLarge(6 * 1024 * 1024);
        assert_eq!(err.to_string(), "body too large (6291456 bytes)");

        let err = ExtractError::MissingField("items");
        assert_eq!(err.to_string(), "missing field in response: items");
    }
}
