//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Sustained link creations per second, per client.
const CREATE_PER_SECOND: u64 = 2;
/// Burst allowance on top of the sustained rate.
const CREATE_BURST: u32 = 20;

/// Creates the rate limiter guarding link creation.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 20 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
/// Redirects and analytics reads are not limited.
///
/// # Key Extraction
///
/// Limits are applied per socket peer address, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_link_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(CREATE_PER_SECOND)
            .burst_size(CREATE_BURST)
            .finish()
            .expect("rate limit constants are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
