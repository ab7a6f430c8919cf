//! Signaling wire protocol
//!
//! One JSON object per WebSocket text frame, discriminated by `type`.
//! The relay only interprets `type`, the session context, and the peer
//! identity fields; negotiation payloads (`offer`, `answer`, `candidate`)
//! are opaque and forwarded unmodified.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{PeerId, SessionId};

/// Signaling envelope exchanged between clients and the relay.
///
/// `join` is client-originated only; `peer-joined` and `peer-left` are
/// server-originated only. Everything else flows client → relay → clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum SignalEnvelope {
    /// Associate this connection with a session, identity, and role.
    Join {
        session_id: SessionId,
        peer_id: PeerId,
        is_instructor: bool,
    },
    /// Announcement to existing members that a new peer joined.
    PeerJoined { peer_id: PeerId, is_instructor: bool },
    /// One half of the negotiation handshake; `offer` is an opaque
    /// session description.
    Offer {
        session_id: SessionId,
        offer: Value,
        from_peer_id: PeerId,
        #[serde(default)]
        is_instructor: bool,
    },
    /// The answering half of the handshake.
    Answer {
        session_id: SessionId,
        answer: Value,
        from_peer_id: PeerId,
    },
    /// A network path candidate proposed during negotiation.
    IceCandidate {
        session_id: SessionId,
        candidate: Value,
        from_peer_id: PeerId,
    },
    ScreenShareStarted {
        session_id: SessionId,
        from_peer_id: PeerId,
    },
    ScreenShareStopped {
        session_id: SessionId,
        from_peer_id: PeerId,
    },
    /// Announcement to remaining members that a peer's connection closed.
    PeerLeft { peer_id: PeerId },
}

impl SignalEnvelope {
    /// Wire-level `type` tag, for logging.
    #[must_use]
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::PeerJoined { .. } => "peer-joined",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::ScreenShareStarted { .. } => "screen-share-started",
            Self::ScreenShareStopped { .. } => "screen-share-stopped",
            Self::PeerLeft { .. } => "peer-left",
        }
    }
}
