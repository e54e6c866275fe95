//! Console transport: JSON-lines events on stdin, JSON-lines requests on stdout
//!
//! Lets the bot run locally without a homeserver. Each stdin line is an
//! [`InboundMessage`]; each stdout line is a [`ConsoleOutput`].

use crate::channels::dispatcher::MessageDispatcher;
use crate::channels::types::{ChatClient, InboundMessage, OutgoingReply, RoomCreation};
use crate::error::{BotError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{oneshot, Mutex};

/// A request the bot makes of the transport, one JSON object per line
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleOutput<'a> {
    Reply(&'a OutgoingReply),
    RoomCreated {
        room_id: &'a str,
        #[serde(flatten)]
        request: &'a RoomCreation,
    },
}

pub struct ConsoleClient {
    server_name: String,
    direct_rooms_file: Option<PathBuf>,
    out: Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
}

impl ConsoleClient {
    /// Console client writing to stdout
    pub fn new(owner: &str, direct_rooms_file: Option<PathBuf>) -> Self {
        Self::with_writer(owner, direct_rooms_file, Box::new(tokio::io::stdout()))
    }

    pub fn with_writer(
        owner: &str,
        direct_rooms_file: Option<PathBuf>,
        out: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Self {
        let server_name = owner
            .split_once(':')
            .map(|(_, server)| server)
            .unwrap_or("localhost")
            .to_string();

        Self {
            server_name,
            direct_rooms_file,
            out: Mutex::new(out),
        }
    }

    async fn emit(&self, output: &ConsoleOutput<'_>) -> Result<()> {
        let mut line = serde_json::to_string(output)
            .map_err(|e| BotError::Transport(format!("failed to encode output: {}", e)))?;
        line.push('\n');

        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        out.flush().await.map_err(|e| BotError::Transport(e.to_string()))
    }
}

#[async_trait]
impl ChatClient for ConsoleClient {
    async fn send_reply(&self, reply: OutgoingReply) -> Result<()> {
        self.emit(&ConsoleOutput::Reply(&reply)).await
    }

    async fn create_room(&self, request: RoomCreation) -> Result<String> {
        let room_id = format!("!autoreply-management:{}", self.server_name);
        self.emit(&ConsoleOutput::RoomCreated {
            room_id: &room_id,
            request: &request,
        })
        .await?;
        Ok(room_id)
    }

    /// Re-read on every call so edits to the file apply immediately
    async fn direct_rooms(&self) -> Result<Value> {
        let Some(path) = &self.direct_rooms_file else {
            return Ok(json!({}));
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BotError::Transport(format!("failed to read {:?}: {}", path, e)))?;
        serde_json::from_str(&content)
            .map_err(|e| BotError::Transport(format!("invalid m.direct data in {:?}: {}", path, e)))
    }
}

/// Feed every line of `input` to `dispatcher` until EOF or shutdown.
///
/// Unparseable lines and failed dispatches are logged and skipped.
pub async fn run_console<R>(
    input: R,
    dispatcher: Arc<MessageDispatcher>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    log::info!("[console] Reading message events from input");

    loop {
        let line = tokio::select! {
            _ = &mut shutdown_rx => {
                log::info!("[console] Received shutdown signal");
                break;
            }
            line = lines.next_line() => line.map_err(|e| BotError::Transport(e.to_string()))?,
        };

        let Some(line) = line else {
            log::info!("[console] Input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let message: InboundMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("[console] Skipping malformed event: {}", e);
                continue;
            }
        };

        let event_id = message.event_id.clone();
        match dispatcher.dispatch(message).await {
            Ok(result) => log::debug!("[console] {} -> {:?}", event_id, result),
            Err(e) => log::error!("[console] Failed to handle {}: {}", event_id, e),
        }
    }

    Ok(())
}
