use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub dataset: DatasetSettings,
    pub log: LogSettings,
}

/// Defines the host and port the server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration settings for rooms and connections.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub max_connections: usize,
    /// Frames queued per connection before deliveries to it start failing.
    pub outbound_buffer: usize,
    /// Room table size. Derived from the dataset when unset.
    pub max_topic_id: Option<u32>,
    pub reply_invalid_topic: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatasetSettings {
    /// JSON catalog file. The bundled catalog is used when unset.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
    pub dataset: Option<DatasetSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub max_connections: Option<usize>,
    pub outbound_buffer: Option<usize>,
    pub max_topic_id: Option<u32>,
    pub reply_invalid_topic: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            broker: BrokerSettings {
                max_connections: 1000,
                outbound_buffer: 64,
                max_topic_id: None,
                reply_invalid_topic: false,
            },
            dataset: DatasetSettings::default(),
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
