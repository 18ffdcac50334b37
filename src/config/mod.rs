mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{BrokerSettings, DatasetSettings, LogSettings, ServerSettings, Settings};

/// Loads the configuration from `config/default` and `DEXROOM__*`
/// environment variables, merged over the defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as [`load_config`] with an explicit base file (extension optional).
pub fn load_config_from(base: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(base).required(false))
        .add_source(
            Environment::with_prefix("DEXROOM")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    let default = Settings::default();
    let server = partial.server;
    let broker = partial.broker;

    Ok(Settings {
        server: ServerSettings {
            host: server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        broker: BrokerSettings {
            max_connections: broker
                .as_ref()
                .and_then(|b| b.max_connections)
                .unwrap_or(default.broker.max_connections),
            outbound_buffer: broker
                .as_ref()
                .and_then(|b| b.outbound_buffer)
                .unwrap_or(default.broker.outbound_buffer),
            max_topic_id: broker
                .as_ref()
                .and_then(|b| b.max_topic_id)
                .or(default.broker.max_topic_id),
            reply_invalid_topic: broker
                .as_ref()
                .and_then(|b| b.reply_invalid_topic)
                .unwrap_or(default.broker.reply_invalid_topic),
        },
        dataset: partial.dataset.unwrap_or(default.dataset),
        log: LogSettings {
            level: partial
                .log
                .and_then(|l| l.level)
                .unwrap_or(default.log.level),
        },
    })
}
