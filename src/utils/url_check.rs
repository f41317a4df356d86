//! URL and hostname validation for user input and configuration.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// DNS hostname: dot-separated labels of letters, digits and inner hyphens.
static HOSTNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
        .unwrap()
});

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlCheckError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Parses `input` and accepts it only as an absolute http(s) URL with a host.
///
/// Rejects `javascript:`, `data:`, `file:` and other schemes.
pub fn parse_http_url(input: &str) -> Result<Url, UrlCheckError> {
    let url = Url::parse(input).map_err(|e| UrlCheckError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlCheckError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlCheckError::MissingHost);
    }

    Ok(url)
}

/// True for a bare hostname such as `lp1.example.com` (no scheme, port or path).
pub fn is_valid_hostname(hostname: &str) -> bool {
    hostname.len() <= 253 && HOSTNAME_REGEX.is_match(hostname)
}
