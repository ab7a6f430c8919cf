//! Signaling endpoint
//!
//! `GET /signaling` upgrades to the WebSocket carrying signaling envelopes;
//! one read pump and one write pump per socket, with the write side fed
//! through an unbounded channel so a slow peer never stalls the router.
//!
//! `POST /signaling` is a narrow side-channel: `get-turn-credentials`
//! returns the configured STUN list (no TURN allocation happens here).

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use lectern_core::{ice, ConnectionState, ConnectionId, SignalEnvelope};

use crate::http::{AppError, AppState};

/// Signaling frames are metadata, not media; 64KB is generous
/// (the axum default of 64MB is not appropriate here).
const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// WebSocket handler for the signaling relay
pub async fn signaling_ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.max_message_size(MAX_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = ConnectionId::generate();

    info!(connection_id = %connection_id, "Signaling connection established");

    // Outbound channel: the hub writes envelopes here, the writer task
    // drains them onto the socket. Fire-and-forget relative to the router.
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<SignalEnvelope>();

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Writer task: serialize and send until the channel closes or the
    // transport reports the peer gone. A failed write just ends delivery
    // to this connection; nobody retries.
    let writer_connection_id = connection_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(envelope) = outbound_rx.recv().await {
            let payload = match serde_json::to_string(&envelope) {
                Ok(payload) => payload,
                Err(e) => {
                    error!(
                        connection_id = %writer_connection_id,
                        error = %e,
                        "Failed to serialize outbound envelope"
                    );
                    continue;
                }
            };

            if ws_sink.send(Message::Text(payload.into())).await.is_err() {
                debug!(
                    connection_id = %writer_connection_id,
                    "Outbound write failed, peer gone"
                );
                break;
            }
        }
    });

    // Read pump: one frame handled to completion before the next, which is
    // what preserves per-sender ordering end to end.
    let mut conn_state = ConnectionState::Unjoined;
    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                state
                    .relay
                    .handle_text(&connection_id, &outbound_tx, &mut conn_state, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // Ignore binary, ping and pong frames
            }
            Err(e) => {
                debug!(
                    connection_id = %connection_id,
                    error = %e,
                    "Signaling connection errored"
                );
                break;
            }
        }
    }

    // Transport close is the leave signal; announce and unregister.
    state.relay.handle_close(&connection_id, &conn_state);

    // Let the writer drain whatever was queued before the close.
    drop(outbound_tx);
    let _ = writer.await;

    info!(connection_id = %connection_id, "Signaling connection closed");
}

#[derive(Debug, Deserialize)]
struct SideChannelRequest {
    action: String,
}

/// Non-upgrade POST side-channel on the signaling endpoint.
///
/// The body is parsed by hand so that *any* unusable payload, JSON or not,
/// gets the same `Unknown action` answer.
pub async fn side_channel_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match serde_json::from_slice::<SideChannelRequest>(&body) {
        Ok(request) if request.action == "get-turn-credentials" => {
            match ice::ice_servers(&state.config.webrtc) {
                Ok(response) => Json(response).into_response(),
                Err(e) => AppError::from(e).into_response(),
            }
        }
        _ => AppError::bad_request("Unknown action").into_response(),
    }
}
