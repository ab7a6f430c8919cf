//! Message routing and per-connection lifecycle
//!
//! Each connection walks `Unjoined -> Joined -> closed`. The transport layer
//! owns the socket and feeds decoded frames in; everything protocol-level
//! (what to register, what to broadcast, what to drop) happens here, so the
//! state machine is testable without a WebSocket in sight.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::hub::{OutboundSender, SessionHub};
use crate::protocol::SignalEnvelope;
use crate::types::{ConnectionId, PeerId, SessionId};

/// Connection state as seen by the router.
///
/// Before `join`, a connection is unassociated and not registered in any
/// session's set; there is nothing to clean up if it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unjoined,
    Joined {
        session_id: SessionId,
        peer_id: PeerId,
        is_instructor: bool,
    },
}

/// Routes inbound envelopes to the right hub mutation and broadcast.
#[derive(Clone)]
pub struct SignalingRelay {
    hub: Arc<SessionHub>,
}

impl SignalingRelay {
    pub fn new(hub: Arc<SessionHub>) -> Self {
        Self { hub }
    }

    #[must_use]
    pub fn hub(&self) -> &Arc<SessionHub> {
        &self.hub
    }

    /// Handle one raw text frame from a connection.
    ///
    /// Malformed JSON and unrecognized `type` tags are logged and dropped;
    /// no error goes back to the sender and the connection stays open.
    pub fn handle_text(
        &self,
        connection_id: &ConnectionId,
        outbound: &OutboundSender,
        state: &mut ConnectionState,
        raw: &str,
    ) {
        match serde_json::from_str::<SignalEnvelope>(raw) {
            Ok(envelope) => self.handle_envelope(connection_id, outbound, state, envelope),
            Err(err) => {
                debug!(
                    connection_id = %connection_id,
                    error = %err,
                    "Dropping malformed signaling envelope"
                );
            }
        }
    }

    /// Handle one decoded envelope from a connection.
    pub fn handle_envelope(
        &self,
        connection_id: &ConnectionId,
        outbound: &OutboundSender,
        state: &mut ConnectionState,
        envelope: SignalEnvelope,
    ) {
        match envelope {
            SignalEnvelope::Join {
                session_id,
                peer_id,
                is_instructor,
            } => match state {
                // The only transition out of Unjoined
                ConnectionState::Unjoined => {
                    self.hub.join(
                        session_id.clone(),
                        peer_id.clone(),
                        is_instructor,
                        connection_id.clone(),
                        outbound.clone(),
                    );

                    self.hub.broadcast_from(
                        &session_id,
                        connection_id,
                        SignalEnvelope::PeerJoined {
                            peer_id: peer_id.clone(),
                            is_instructor,
                        },
                    );

                    *state = ConnectionState::Joined {
                        session_id,
                        peer_id,
                        is_instructor,
                    };
                }
                // Repeated join is not a defined transition; ignore it
                ConnectionState::Joined { .. } => {
                    debug!(
                        connection_id = %connection_id,
                        requested_session_id = %session_id,
                        "Ignoring join on an already-joined connection"
                    );
                }
            },

            // Clients must not speak with the server's voice
            envelope @ (SignalEnvelope::PeerJoined { .. } | SignalEnvelope::PeerLeft { .. }) => {
                warn!(
                    connection_id = %connection_id,
                    message_type = %envelope.message_type(),
                    "Dropping server-originated message type sent by a client"
                );
            }

            // offer / answer / ice-candidate / screen-share notifications
            envelope => match state {
                // Forwarded verbatim to the other members of the session
                // this connection joined. Routing trusts the joined session,
                // not the envelope's own sessionId field.
                ConnectionState::Joined { session_id, .. } => {
                    self.hub.broadcast_from(session_id, connection_id, envelope);
                }
                // No session context yet; nothing to route
                ConnectionState::Unjoined => {
                    debug!(
                        connection_id = %connection_id,
                        message_type = %envelope.message_type(),
                        "Dropping envelope received before join"
                    );
                }
            },
        }
    }

    /// Transport-level close, the only way a connection leaves.
    ///
    /// A joined connection is unregistered and announced to the remaining
    /// members as `peer-left`; an unjoined close needs no cleanup.
    pub fn handle_close(&self, connection_id: &ConnectionId, state: &ConnectionState) {
        if matches!(state, ConnectionState::Unjoined) {
            return;
        }

        if let Some((session_id, peer_id)) = self.hub.leave(connection_id) {
            self.hub.broadcast_from(
                &session_id,
                connection_id,
                SignalEnvelope::PeerLeft { peer_id },
            );
        }
    }
}
