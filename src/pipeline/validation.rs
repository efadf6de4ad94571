use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?([a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+)(/\S*)?$")
        .expect("Failed to compile URL regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid URL format. Please enter a valid URL.")]
pub struct ValidationError;

/// Shape check run before any network activity: optional http(s) scheme,
/// a dotted host name and an optional path without whitespace.
pub fn validate_url(url: &str) -> Result<&str, ValidationError> {
    if URL_REGEX.is_match(url) {
        Ok(url)
    } else {
        Err(ValidationError)
    }
}
