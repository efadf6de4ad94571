use reqwest::StatusCode;
use thiserror::Error;

/// Failure to retrieve a page. Every variant is terminal for a pipeline run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error: invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL returned status code {}", .0.as_u16())]
    HttpStatus(StatusCode),

    #[error("Request error: connection failed: {0}")]
    Connect(String),

    #[error("Request error: connect timeout")]
    ConnectTimeout,

    #[error("Request error: request timeout")]
    RequestTimeout,

    #[error("Request error: too many redirects")]
    RedirectLoop,

    #[error("Request error: body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("Request error: failed to read body: {0}")]
    Body(String),

    #[error("Request error: {0}")]
    Transport(String),
}

impl FetchError {
    /// True for failures that happened before any HTTP status was seen.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::HttpStatus(_) | Self::InvalidUrl(_))
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status)
        } else if err.is_connect() {
            // DNS and refused connections both surface here
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_names_the_code() {
        let err = FetchError::HttpStatus(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "URL returned status code 404");
        assert!(!err.is_transport());
    }

    #[test]
    fn transport_errors_share_prefix() {
        for err in [
            FetchError::ConnectTimeout,
            FetchError::RequestTimeout,
            FetchError::RedirectLoop,
            FetchError::Connect("dns error".to_string()),
        ] {
            assert!(err.to_string().starts_with("Request error: "));
            assert!(err.is_transport());
        }
    }
}
