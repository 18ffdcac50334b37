use serde::{Deserialize, Deserializer, Serialize};

/// Events sent by a peer. `pokemon` is the raw topic reference; it is
/// validated by the topic directory, not here.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "init")]
    Init {
        #[serde(deserialize_with = "topic_ref")]
        pokemon: i64,
    },

    #[serde(rename = "message")]
    Message {
        #[serde(deserialize_with = "topic_ref")]
        pokemon: i64,
        message: String,
        /// Ignored: relayed chat carries the server-assigned identity.
        #[serde(default)]
        clientname: Option<String>,
    },

    #[serde(rename = "leaving")]
    Leaving {
        #[serde(deserialize_with = "topic_ref")]
        pokemon: i64,
    },
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Connected,
    Disconnected,
}

/// Events sent to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "init")]
    Init { clientname: String },

    #[serde(rename = "majuser")]
    MajUser {
        newnb: usize,
        who: String,
        status: PresenceStatus,
    },

    #[serde(rename = "message")]
    Message { message: String, from: String },

    #[serde(rename = "error")]
    Error { message: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTopic {
    Number(i64),
    Text(String),
}

// Browsers often send ids read from the DOM as strings.
fn topic_ref<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match RawTopic::deserialize(deserializer)? {
        RawTopic::Number(n) => Ok(n),
        RawTopic::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
