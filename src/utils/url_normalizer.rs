//! URL validation and normalization for link targets.
//!
//! Targets are stored in a canonical form so that the same destination always
//! looks the same in the store and in API responses.

use url::Url;

/// Upper bound on the length of a target URL.
pub const MAX_URL_LENGTH: usize = 4096;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: Only HTTP and HTTPS are allowed
/// 2. **Hostname**: Converted to lowercase
/// 3. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 4. **Path, query, fragment**: Preserved as-is
///
/// Surrounding whitespace is trimmed before parsing.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let Some(host) = url.host_str() else {
        return Err(UrlNormalizationError::MissingHost);
    };

    let host_lowercase = host.to_ascii_lowercase();
    url.set_host(Some(&host_lowercase)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple_https() {
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_normalize_uppercase_host() {
        assert_eq!(
            normalize_url("https://EXAMPLE.COM/Path").unwrap(),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_normalize_remove_default_ports() {
        assert_eq!(
            normalize_url("http://example.com:80/path").unwrap(),
            "http://example.com/path"
        );
        assert_eq!(
            normalize_url("https://example.com:443/path").unwrap(),
            "https://example.com/path"
        );
    }

    #[test]
    fn test_normalize_keep_custom_port() {
        assert_eq!(
            normalize_url("http://localhost:3000/test").unwrap(),
            "http://localhost:3000/test"
        );
    }

    #[test]
    fn test_normalize_keeps_query_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page?key=VALUE#section").unwrap(),
            "https://example.com/page?key=VALUE#section"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://example.com/a  ").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_normalize_empty_string() {
        assert!(matches!(
            normalize_url("   ").unwrap_err(),
            UrlNormalizationError::Empty
        ));
    }

    #[test]
    fn test_normalize_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            normalize_url(&url).unwrap_err(),
            UrlNormalizationError::TooLong
        ));
    }

    #[test]
    fn test_normalize_invalid_url() {
        assert!(matches!(
            normalize_url("not a valid url").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
        assert!(matches!(
            normalize_url("example.com").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_rejects_other_protocols() {
        for input in [
            "ftp://example.com/file.txt",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
        ] {
            assert!(
                matches!(
                    normalize_url(input).unwrap_err(),
                    UrlNormalizationError::UnsupportedProtocol
                ),
                "{input} should be rejected"
            );
        }
    }
}
