//! ICE server hand-out
//!
//! The relay never allocates TURN relays; it only hands clients the STUN
//! addresses they need to discover their own public candidates. The list
//! comes from configuration and is returned as-is on the signaling
//! endpoint's POST side-channel.

use serde::{Deserialize, Serialize};

use crate::config::WebRtcConfig;
use crate::error::{Error, Result};

/// One ICE server entry as WebRTC clients expect it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServer {
    /// Server address, e.g. `stun:stun.l.google.com:19302`
    pub urls: String,
}

/// Response body for the `get-turn-credentials` side-channel action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServersResponse {
    pub ice_servers: Vec<IceServer>,
}

/// Assemble the ICE server list from configuration.
///
/// An empty list is a deployment mistake surfaced as `NotConfigured` so the
/// HTTP layer can flag it to clients rather than hand back nothing.
pub fn ice_servers(config: &WebRtcConfig) -> Result<IceServersResponse> {
    if config.stun_servers.is_empty() {
        return Err(Error::NotConfigured(
            "no STUN servers configured".to_string(),
        ));
    }

    Ok(IceServersResponse {
        ice_servers: config
            .stun_servers
            .iter()
            .map(|urls| IceServer { urls: urls.clone() })
            .collect(),
    })
}
