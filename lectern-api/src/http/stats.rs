//! Hub occupancy counts for monitoring

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::http::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Live sessions (at least one joined connection each)
    pub sessions: usize,
    /// Joined connections across all sessions
    pub connections: usize,
}

pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let hub = state.relay.hub();
    Json(StatsResponse {
        sessions: hub.session_count(),
        connections: hub.connection_count(),
    })
}
