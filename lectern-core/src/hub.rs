use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::SignalEnvelope;
use crate::types::{ConnectionId, PeerId, SessionId};

/// Outbound handle for one member connection
pub type OutboundSender = mpsc::UnboundedSender<SignalEnvelope>;

/// One joined connection inside a session's member set
#[derive(Debug, Clone)]
struct Member {
    connection_id: ConnectionId,
    peer_id: PeerId,
    is_instructor: bool,
    sender: OutboundSender,
}

/// In-memory registry mapping session ids to their joined connections,
/// with broadcast fan-out. One instance per process; peers in the same
/// session must reach the same hub.
///
/// A session exists exactly while its member set is non-empty: the entry is
/// created on the first `join` and removed when the last member leaves, so
/// the map does not grow across the lifetime of the server as sessions end.
#[derive(Clone)]
pub struct SessionHub {
    /// Map of session_id -> list of members
    sessions: Arc<DashMap<SessionId, Vec<Member>>>,

    /// Map of connection_id -> (session_id, peer_id) for close-time cleanup
    connections: Arc<DashMap<ConnectionId, (SessionId, PeerId)>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            connections: Arc::new(DashMap::new()),
        }
    }

    /// Register a connection under a session, creating the session entry if
    /// absent. The sender handle is how broadcasts reach this member's
    /// transport.
    pub fn join(
        &self,
        session_id: SessionId,
        peer_id: PeerId,
        is_instructor: bool,
        connection_id: ConnectionId,
        sender: OutboundSender,
    ) {
        let member = Member {
            connection_id: connection_id.clone(),
            peer_id: peer_id.clone(),
            is_instructor,
            sender,
        };

        self.sessions
            .entry(session_id.clone())
            .or_default()
            .push(member);

        self.connections
            .insert(connection_id.clone(), (session_id.clone(), peer_id.clone()));

        info!(
            session_id = %session_id,
            peer_id = %peer_id,
            connection_id = %connection_id,
            is_instructor,
            "Connection joined session"
        );
    }

    /// Remove a connection from its session, dropping the session entry when
    /// the member set empties. Returns what was removed so the caller can
    /// announce `peer-left`. Unknown connection ids are a normal occurrence
    /// (the connection never joined, or a failed send already swept it).
    pub fn leave(&self, connection_id: &ConnectionId) -> Option<(SessionId, PeerId)> {
        let Some((_, (session_id, peer_id))) = self.connections.remove(connection_id) else {
            debug!(
                connection_id = %connection_id,
                "Leave for connection not registered in any session"
            );
            return None;
        };

        if let Some(mut members) = self.sessions.get_mut(&session_id) {
            members.retain(|m| m.connection_id != *connection_id);

            if members.is_empty() {
                drop(members); // Drop the RefMut before removing
                self.sessions.remove(&session_id);
                debug!(session_id = %session_id, "Session has no more members, removed");
            }
        }

        info!(
            session_id = %session_id,
            peer_id = %peer_id,
            connection_id = %connection_id,
            "Connection left session"
        );

        Some((session_id, peer_id))
    }

    /// Deliver an envelope to every member of a session except the sending
    /// connection. A member whose transport has gone away is skipped and
    /// swept from the registry; delivery to the others continues. Returns
    /// the number of members reached.
    pub fn broadcast_from(
        &self,
        session_id: &SessionId,
        sender_connection_id: &ConnectionId,
        envelope: SignalEnvelope,
    ) -> usize {
        let mut sent_count = 0;
        let mut failed_connections = Vec::new();

        if let Some(members) = self.sessions.get(session_id) {
            for member in members.iter() {
                if member.connection_id == *sender_connection_id {
                    continue;
                }

                match member.sender.send(envelope.clone()) {
                    Ok(()) => {
                        sent_count += 1;
                    }
                    Err(err) => {
                        warn!(
                            session_id = %session_id,
                            peer_id = %member.peer_id,
                            connection_id = %member.connection_id,
                            error = %err,
                            "Failed to deliver envelope, marking connection for cleanup"
                        );
                        failed_connections.push(member.connection_id.clone());
                    }
                }
            }
        }

        // Clean up failed connections outside the member borrow
        for conn_id in failed_connections {
            self.leave(&conn_id);
        }

        if sent_count > 0 {
            debug!(
                session_id = %session_id,
                sent_count,
                message_type = %envelope.message_type(),
                "Broadcast complete"
            );
        }

        sent_count
    }

    /// Number of connections currently joined to a session. Zero for unknown
    /// or already-cleaned-up sessions; never an error.
    pub fn member_count(&self, session_id: &SessionId) -> usize {
        self.sessions
            .get(session_id)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Total number of joined connections across all sessions.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether a session id is currently present in the registry.
    pub fn contains_session(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Snapshot of a session's members (for monitoring).
    pub fn session_members(&self, session_id: &SessionId) -> Vec<(PeerId, bool)> {
        self.sessions
            .get(session_id)
            .map(|members| {
                members
                    .iter()
                    .map(|m| (m.peer_id.clone(), m.is_instructor))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}
