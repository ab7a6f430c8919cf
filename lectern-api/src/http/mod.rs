// Module: http
// HTTP/WebSocket surface of the signaling relay

pub mod error;
pub mod health;
pub mod signaling;
pub mod stats;

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lectern_core::{Config, SessionHub, SignalingRelay};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<SignalingRelay>,
    pub config: Arc<Config>,
}

/// Create the HTTP router with all routes
///
/// The hub is injected rather than constructed here: peers in the same
/// session must reach the same registry instance, so the process owns
/// exactly one and hands it in.
pub fn create_router(hub: Arc<SessionHub>, config: Arc<Config>) -> axum::Router {
    let state = AppState {
        relay: Arc::new(SignalingRelay::new(hub)),
        config,
    };

    let router = Router::new()
        // Health check endpoints (for monitoring probes)
        .merge(health::create_health_router())
        // Hub occupancy counts (for monitoring)
        .route("/stats", get(stats::get_stats))
        // Signaling: WebSocket upgrade on GET, side-channel on POST.
        // OPTIONS preflight is answered by the CORS layer.
        .route(
            "/signaling",
            get(signaling::signaling_ws_handler).post(signaling::side_channel_handler),
        );

    // Apply layers before state
    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
