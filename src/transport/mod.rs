//! The `transport` module is responsible for handling network communication
//! with clients via WebSockets.
//!
//! It defines the JSON event protocol exchanged with peers and implements
//! the WebSocket server that feeds raw frames to the connection registry.

pub mod message;
pub mod websocket;

#[cfg(test)]
mod tests;
