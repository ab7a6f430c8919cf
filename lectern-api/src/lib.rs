//! Lectern API — HTTP/WebSocket surface for the signaling relay
//!
//! One endpoint does the work: `GET /signaling` upgrades to the WebSocket
//! that carries signaling envelopes, and `POST /signaling` serves the
//! ICE-server side-channel. `/health` and `/stats` exist for probes.

pub mod http;
