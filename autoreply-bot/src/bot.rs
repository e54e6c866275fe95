//! Bot lifecycle: startup (management room binding) and shutdown

use crate::channels::{ChatClient, RoomCreation};
use crate::config::SettingsHandle;
use crate::db::Database;
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Running bot instance for one owner
pub struct AutoReplyBot {
    owner: String,
    management_room: String,
    db: Arc<Database>,
    settings: Arc<SettingsHandle>,
    client: Arc<dyn ChatClient>,
    running: AtomicBool,
}

impl AutoReplyBot {
    /// Start the bot for `owner`.
    ///
    /// Reuses the stored management room, or creates one through `client`
    /// and binds it on first start.
    pub async fn init(
        owner: impl Into<String>,
        db: Arc<Database>,
        settings: Arc<SettingsHandle>,
        client: Arc<dyn ChatClient>,
    ) -> Result<Self> {
        let owner = owner.into();

        let management_room = match db.get_management_room(&owner)? {
            Some(room_id) => {
                log::info!("[autoreply] Using management room {} for {}", room_id, owner);
                room_id
            }
            None => {
                let room = settings.current().room;
                let room_id = client
                    .create_room(RoomCreation::management_room(&room.name, &room.icon))
                    .await?;
                db.store_management_room(&owner, &room_id)?;
                log::info!("[autoreply] Created management room {} for {}", room_id, owner);
                room_id
            }
        };

        Ok(Self {
            owner,
            management_room,
            db,
            settings,
            client,
            running: AtomicBool::new(true),
        })
    }

    /// Stop accepting events. Stored state is left as is.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            log::info!("[autoreply] Bot for {} shut down", self.owner);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn management_room(&self) -> &str {
        &self.management_room
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn client(&self) -> &dyn ChatClient {
        self.client.as_ref()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::BotError;

    #[tokio::test]
    async fn test_first_start_creates_and_binds_room() {
        let db = Arc::new(Database::new(":memory:").unwrap());
        let client = Arc::new(RecordingClient::with_direct_rooms(&[]));

        let bot = AutoReplyBot::init(OWNER, db.clone(), settings(), client.clone())
            .await
            .unwrap();

        assert_eq!(bot.management_room(), MANAGEMENT_ROOM);
        assert_eq!(db.get_management_room(OWNER).unwrap().as_deref(), Some(MANAGEMENT_ROOM));

        let created = client.rooms_created.lock();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "Auto-reply");
    }

    #[tokio::test]
    async fn test_restart_reuses_bound_room() {
        let db = Arc::new(Database::new(":memory:").unwrap());
        db.store_management_room(OWNER, "!existing:example.org").unwrap();
        let client = Arc::new(RecordingClient::with_direct_rooms(&[]));

        let bot = AutoReplyBot::init(OWNER, db, settings(), client.clone())
            .await
            .unwrap();

        assert_eq!(bot.management_room(), "!existing:example.org");
        assert!(client.rooms_created.lock().is_empty());
    }

    #[tokio::test]
    async fn test_room_creation_failure_binds_nothing() {
        struct FailingClient;

        #[async_trait::async_trait]
        impl ChatClient for FailingClient {
            async fn send_reply(&self, _reply: crate::channels::OutgoingReply) -> Result<()> {
                Ok(())
            }
            async fn create_room(&self, _request: RoomCreation) -> Result<String> {
                Err(BotError::Transport("homeserver down".to_string()))
            }
            async fn direct_rooms(&self) -> Result<serde_json::Value> {
                Ok(serde_json::Value::Null)
            }
        }

        let db = Arc::new(Database::new(":memory:").unwrap());
        let result = AutoReplyBot::init(OWNER, db.clone(), settings(), Arc::new(FailingClient)).await;

        assert!(matches!(result, Err(BotError::Transport(_))));
        assert_eq!(db.get_management_room(OWNER).unwrap(), None);
    }

    #[tokio::test]
    async fn test_shutdown_stops_bot() {
        let (bot, _client) = bot_with_direct_rooms(&[]).await;
        assert!(bot.is_running());
        bot.shutdown();
        bot.shutdown();
        assert!(!bot.is_running());
    }
}
