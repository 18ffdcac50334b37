//! CLI for dexroom
//!
//! Subcommands:
//! - `server`: run the WebSocket server
//! - `client`: join a topic room and print what happens (useful for smoke tests)
//! - `show` / `search`: query the configured catalog

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dexroom::config::load_config;
use dexroom::directory::Dataset;
use dexroom::registry::Registry;
use dexroom::transport::message::{ClientMessage, ServerMessage};
use dexroom::transport::websocket::start_websocket_server;
use dexroom::utils::error::AppError;
use dexroom::utils::logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dexroom")]
enum Command {
    /// Start the WebSocket server
    Server,
    /// Connect, join a topic room, optionally say something, print events
    Client {
        /// WebSocket server URL to connect to
        #[arg(long, default_value = "ws://127.0.0.1:3000")]
        url: String,
        /// Topic (catalog number) to join
        #[arg(long, default_value_t = 25)]
        topic: i64,
        /// Message to send once joined
        #[arg(long)]
        message: Option<String>,
        /// Seconds to keep listening
        #[arg(long, default_value_t = 3)]
        listen: u64,
    },
    /// Print the catalog entry with this number as JSON
    Show { num: u32 },
    /// Search catalog names and types, ignoring case
    Search { query: String },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cmd = Command::parse();

    let result = match cmd {
        Command::Server => run_server().await,
        Command::Client {
            url,
            topic,
            message,
            listen,
        } => {
            logging::init("info");
            run_client(&url, topic, message, Duration::from_secs(listen)).await
        }
        Command::Show { num } => run_show(num),
        Command::Search { query } => run_search(&query),
    };

    if let Err(e) = result {
        logging::init("info");
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run_server() -> Result<(), AppError> {
    let config = load_config()?;
    logging::init(&config.log.level);

    let registry = Arc::new(Registry::from_settings(&config)?);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    tokio::select! {
        result = start_websocket_server(&addr, registry) => {
            result?;
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

fn load_dataset() -> Result<Dataset, AppError> {
    let config = load_config()?;
    Ok(Dataset::load_or_bundled(config.dataset.path.as_deref())?)
}

fn run_show(num: u32) -> Result<(), AppError> {
    let dataset = load_dataset()?;
    let entry = dataset.lookup(num).ok_or(AppError::UnknownEntry(num))?;
    println!("{}", serde_json::to_string_pretty(entry)?);
    Ok(())
}

fn run_search(query: &str) -> Result<(), AppError> {
    let dataset = load_dataset()?;
    let results = dataset.search(query);
    if results.is_empty() {
        return Err(AppError::NoMatch(query.to_string()));
    }
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn run_client(
    url: &str,
    topic: i64,
    message: Option<String>,
    listen: Duration,
) -> Result<(), AppError> {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message as WsMessage;

    let (mut ws_stream, _response) = connect_async(url).await?;

    let join = serde_json::to_string(&ClientMessage::Init { pokemon: topic })?;
    ws_stream.send(WsMessage::Text(join.into())).await?;

    if let Some(text) = message {
        let chat = serde_json::to_string(&ClientMessage::Message {
            pokemon: topic,
            message: text,
            clientname: None,
        })?;
        ws_stream.send(WsMessage::Text(chat.into())).await?;
    }

    let deadline = tokio::time::sleep(listen);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            frame = ws_stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(ServerMessage::Init { clientname }) => println!("You are {clientname}"),
                        Ok(ServerMessage::MajUser { newnb, who, status }) => {
                            println!("{who} {status:?} ({newnb} in room)")
                        }
                        Ok(ServerMessage::Message { message, from }) => println!("{from}: {message}"),
                        Ok(ServerMessage::Error { message }) => println!("error: {message}"),
                        Err(_) => println!("Incoming: {}", text.as_str()),
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    let _ = ws_stream.close(None).await;
    Ok(())
}
