//! Lectern core — WebRTC signaling relay domain logic
//!
//! Transport-independent pieces of the relay:
//!
//! - **`SessionHub`**: registry mapping session ids to the connections
//!   currently joined to them, with broadcast-with-exclusion delivery
//! - **`SignalingRelay`**: per-connection state machine and message router
//! - **`SignalEnvelope`**: the JSON wire vocabulary exchanged with clients
//!
//! The HTTP/WebSocket surface lives in `lectern-api`; this crate never
//! touches a socket, which keeps the state machine testable in isolation.

pub mod config;
pub mod error;
pub mod hub;
pub mod ice;
pub mod logging;
pub mod protocol;
pub mod router;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use hub::SessionHub;
pub use protocol::SignalEnvelope;
pub use router::{ConnectionState, SignalingRelay};
pub use types::{ConnectionId, PeerId, SessionId};
