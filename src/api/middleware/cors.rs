//! CORS policy for the browser frontend.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Allows the configured frontend origin to call the JSON API.
///
/// Returns `None` when no origin is configured or the value is not a valid
/// header, in which case no CORS headers are emitted at all.
pub fn layer(allowed_origin: Option<&str>) -> Option<CorsLayer> {
    let origin = allowed_origin?;

    let Ok(origin) = HeaderValue::from_str(origin.trim_end_matches('/')) else {
        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
        return None;
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_origin_no_layer() {
        assert!(layer(None).is_none());
    }

    #[test]
    fn test_configured_origin_builds_layer() {
        assert!(layer(Some("http://localhost:5173/")).is_some());
    }
}
