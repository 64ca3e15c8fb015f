//! Push Sandbox
//!
//! In-memory stand-in for the push registration endpoints of the PubNub
//! service, for local development and integration tests.

mod handlers;
mod state;

pub use handlers::*;
pub use state::*;

use axum::Router;

/// Create the push management router.
pub fn push_router(state: SandboxState) -> Router {
    use axum::routing::get;

    Router::new()
        .route(
            "/v1/push/sub-key/{sub_key}/devices/{token}",
            get(handlers::modify_v1),
        )
        .route(
            "/v1/push/sub-key/{sub_key}/devices/{token}/remove",
            get(handlers::remove_device_v1),
        )
        .route(
            "/v2/push/sub-key/{sub_key}/devices-apns2/{token}",
            get(handlers::modify_v2),
        )
        .route(
            "/v2/push/sub-key/{sub_key}/devices-apns2/{token}/remove",
            get(handlers::remove_device_v2),
        )
        .with_state(state)
}
