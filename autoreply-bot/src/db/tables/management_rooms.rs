//! Management room binding operations

use rusqlite::{ErrorCode, OptionalExtension};

use super::super::Database;
use crate::error::{BotError, Result};

impl Database {
    /// Get the management room bound to `owner`, if any
    pub fn get_management_room(&self, owner: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let room_id = conn
            .query_row(
                "SELECT room_id FROM autoreply_management_rooms WHERE user_id = ?1",
                [owner],
                |row| row.get(0),
            )
            .optional()?;
        Ok(room_id)
    }

    /// Bind `room_id` as the management room of `owner`.
    ///
    /// The binding is written once; a second call for the same owner fails
    /// with [`BotError::DuplicateManagementRoom`].
    pub fn store_management_room(&self, owner: &str, room_id: &str) -> Result<()> {
        let conn = self.conn.lock();
        match conn.execute(
            "INSERT INTO autoreply_management_rooms (user_id, room_id) VALUES (?1, ?2)",
            [owner, room_id],
        ) {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(BotError::DuplicateManagementRoom {
                    owner: owner.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
