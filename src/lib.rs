//! # dexroom
//!
//! `dexroom` is a real-time presence and chat server keyed by catalog topic:
//! every entry of a small read-only catalog has its own chat room. Peers
//! connect over WebSockets, receive a generated identity, join the room of
//! the entry they are viewing, and see who comes and goes.
//!
//! ## Core Modules
//!
//! - `directory`: the catalog, topic validation and identity generation.
//! - `broker`: rooms, the room table and the broadcast engine.
//! - `client`: the server-side handle of one connection.
//! - `session`: the per-connection state machine.
//! - `registry`: accepts connections and routes their events.
//! - `transport`: wire protocol and WebSocket server.
//! - `config`: configuration loading.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod directory;
pub mod registry;
pub mod session;
pub mod transport;
pub mod utils;
