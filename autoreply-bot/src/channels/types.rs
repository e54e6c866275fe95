use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Megolm algorithm enabled on the management room
pub const ENCRYPTION_ALGORITHM: &str = "m.megolm.v1.aes-sha2";

/// An `m.room.message` event as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    pub sender_id: String,
    pub room_id: String,
    pub event_id: String,
    pub body: String,
    #[serde(default)]
    pub is_markdown: bool,
}

/// A reply the bot asks the transport to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingReply {
    pub room_id: String,
    pub in_reply_to: String,
    pub body: String,
    pub markdown: bool,
}

impl OutgoingReply {
    /// Plain-text reply to `message`, in the room it came from
    pub fn plain(message: &InboundMessage, body: impl Into<String>) -> Self {
        Self {
            room_id: message.room_id.clone(),
            in_reply_to: message.event_id.clone(),
            body: body.into(),
            markdown: false,
        }
    }

    /// Reply whose body is rendered as markdown
    pub fn markdown(message: &InboundMessage, body: impl Into<String>) -> Self {
        Self {
            markdown: true,
            ..Self::plain(message, body)
        }
    }
}

/// State event applied when a room is created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialStateEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub content: Value,
}

/// Request to create the management room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomCreation {
    pub name: String,
    pub initial_state: Vec<InitialStateEvent>,
}

impl RoomCreation {
    /// Named, end-to-end encrypted room with `icon` as its avatar
    pub fn management_room(name: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            initial_state: vec![
                InitialStateEvent {
                    event_type: "m.room.avatar".to_string(),
                    content: json!({ "url": icon }),
                },
                InitialStateEvent {
                    event_type: "m.room.encryption".to_string(),
                    content: json!({ "algorithm": ENCRYPTION_ALGORITHM }),
                },
            ],
        }
    }
}

/// Everything the bot needs from the chat network
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_reply(&self, reply: OutgoingReply) -> Result<()>;

    /// Create a room and return its id
    async fn create_room(&self, request: RoomCreation) -> Result<String>;

    /// Raw `m.direct` account data: user id -> list of room ids
    async fn direct_rooms(&self) -> Result<Value>;
}
