//! The `client` module defines the server-side handle of one live connection.
//!
//! A `Client` is cheap to clone: rooms store clones of it so that a
//! broadcast can run from a snapshot without holding any lock.

pub mod connection;
pub use connection::{Client, ConnectionId};
