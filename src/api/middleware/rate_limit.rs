//! Per-IP rate limiting using the token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type IpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build(replenish_every_secs: u64, burst: u32) -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(replenish_every_secs)
            .burst_size(burst)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}

/// Limiter for the login endpoint.
///
/// # Limits
///
/// - **Replenish**: one request every 6 seconds
/// - **Burst**: 5 requests
///
/// Slows down password guessing. Requests over the limit get
/// `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Keyed on the socket peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn login_layer() -> IpGovernorLayer {
    build(6, 5)
}

/// Limiter for admin operations (domain pool changes, manual rotation).
///
/// # Limits
///
/// - **Replenish**: one request per second
/// - **Burst**: 10 requests
pub fn secure_layer() -> IpGovernorLayer {
    build(1, 10)
}
