//! Client address extraction for click records.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Determines the client IP for a request.
///
/// When `behind_proxy` is set, the first hop of `X-Forwarded-For` wins,
/// then `X-Real-IP`. Otherwise, and as a fallback, the socket peer address
/// is used. Forwarding headers are ignored when the service is exposed
/// directly, since any client can set them.
pub fn extract_client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_owned();
        }

        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_owned();
        }
    }

    peer.ip().to_string()
}
