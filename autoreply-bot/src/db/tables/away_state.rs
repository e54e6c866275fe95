//! Away/back flag operations

use rusqlite::OptionalExtension;

use super::super::Database;
use crate::error::Result;
use crate::models::AwayState;

impl Database {
    /// Whether `owner` is marked away; an owner with no row is back
    pub fn is_away(&self, owner: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let is_away: Option<bool> = conn
            .query_row(
                "SELECT is_away FROM autoreply_user_away WHERE user_id = ?1",
                [owner],
                |row| row.get(0),
            )
            .optional()?;
        Ok(is_away.unwrap_or(false))
    }

    pub fn away_state(&self, owner: &str) -> Result<AwayState> {
        self.is_away(owner).map(AwayState::from)
    }

    /// Upsert the flag; last write wins
    pub fn update_away_state(&self, owner: &str, is_away: bool) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO autoreply_user_away (user_id, is_away) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET is_away = excluded.is_away",
            rusqlite::params![owner, is_away],
        )?;
        Ok(())
    }
}
