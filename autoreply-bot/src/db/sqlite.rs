//! SQLite database - schema definitions and connection management
//!
//! All per-table operations live in the tables/ subdirectory as
//! `impl Database` blocks.

use crate::error::Result;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// Single shared connection; the mutex serializes every statement
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database and make sure the schema exists
    pub fn new(database_url: &str) -> Result<Self> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("[store] Could not create {:?}: {}", parent, e);
                }
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        let conn = self.conn.lock();

        // One management room per owner, written once
        conn.execute(
            "CREATE TABLE IF NOT EXISTS autoreply_management_rooms (
                user_id TEXT PRIMARY KEY,
                room_id TEXT NOT NULL
            )",
            [],
        )?;

        // First missed message per (owner, room)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS autoreply_messages (
                room_id TEXT NOT NULL,
                event_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                PRIMARY KEY (user_id, room_id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS autoreply_user_away (
                user_id TEXT PRIMARY KEY,
                is_away BOOLEAN NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("autoreply.db");
        let path = path.to_str().unwrap();

        let db = Database::new(path).unwrap();
        db.update_away_state("@owner:example.org", true).unwrap();
        drop(db);

        // Reopening must not wipe or fail on existing tables
        let db = Database::new(path).unwrap();
        assert!(db.is_away("@owner:example.org").unwrap());
    }
}
