//! The `error` module defines the error types used within `dexroom`.
//!
//! Only startup failures (configuration, dataset, bind) ever reach `main`.
//! Per-connection problems are reported as `Dispatch` values by the session
//! layer and logged, never propagated as errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::directory::TopicId;

/// Errors raised while loading the external dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset entry '{name}' has number 0; numbers start at 1")]
    ZeroNumber { name: String },
}

/// Errors raised while building the topic directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("dataset has no entries; cannot derive identities")]
    EmptyDataset,
}

/// Errors raised by the room table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("topic {topic} is outside the room table (1..={capacity})")]
    OutOfRange { topic: TopicId, capacity: usize },
}

/// Why a single frame could not be queued for a peer.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("peer connection is closed")]
    Closed,

    #[error("peer outbound queue is full")]
    Full,

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Top-level error for startup and the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("room table holds {configured} topics but the dataset reaches {dataset_max}")]
    RoomTableTooSmall { configured: usize, dataset_max: u32 },

    #[error("room table of {requested} topics exceeds the limit of {limit}")]
    RoomTableTooLarge { requested: u32, limit: u32 },

    #[error("no catalog entry with number {0}")]
    UnknownEntry(u32),

    #[error("no catalog entry matches '{0}'")]
    NoMatch(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    WebSocket(#[from] tungstenite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
