//! Missed-message marker operations

use rusqlite::OptionalExtension;

use super::super::Database;
use crate::error::Result;
use crate::models::MissedMessage;

impl Database {
    /// Event id of the first missed message in `room_id`, if one is recorded
    pub fn get_message_marker(&self, owner: &str, room_id: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let event_id = conn
            .query_row(
                "SELECT event_id FROM autoreply_messages WHERE user_id = ?1 AND room_id = ?2",
                [owner, room_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(event_id)
    }

    /// Record `event_id` as the first missed message in `room_id` unless a
    /// marker already exists for that room.
    ///
    /// Returns `true` if this call wrote the marker. Check and insert are one
    /// statement, so concurrent callers cannot both win.
    pub fn store_message_marker(&self, owner: &str, room_id: &str, event_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let rows_affected = conn.execute(
            "INSERT INTO autoreply_messages (room_id, event_id, user_id) VALUES (?1, ?2, ?3)
             ON CONFLICT DO NOTHING",
            [room_id, event_id, owner],
        )?;
        Ok(rows_affected > 0)
    }

    /// All markers of `owner`, in insertion order
    pub fn get_all_missed_message_markers(&self, owner: &str) -> Result<Vec<MissedMessage>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT room_id, event_id FROM autoreply_messages WHERE user_id = ?1 ORDER BY rowid",
        )?;

        let markers = stmt
            .query_map([owner], |row| {
                Ok(MissedMessage::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(markers)
    }

    /// Delete every marker of `owner`, returning how many were removed
    pub fn clear_all_missed_message_markers(&self, owner: &str) -> Result<usize> {
        let conn = self.conn.lock();
        let rows_affected = conn.execute("DELETE FROM autoreply_messages WHERE user_id = ?1", [owner])?;
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "@owner:example.org";

    #[test]
    fn test_marker_absent_by_default() {
        let db = Database::new(":memory:").unwrap();
        assert_eq!(db.get_message_marker(OWNER, "!r1:example.org").unwrap(), None);
    }

    #[test]
    fn test_first_marker_wins() {
        let db = Database::new(":memory:").unwrap();
        assert!(db.store_message_marker(OWNER, "!r1:example.org", "$a").unwrap());
        assert!(!db.store_message_marker(OWNER, "!r1:example.org", "$b").unwrap());
        assert!(!db.store_message_marker(OWNER, "!r1:example.org", "$c").unwrap());

        assert_eq!(
            db.get_message_marker(OWNER, "!r1:example.org").unwrap().as_deref(),
            Some("$a")
        );
        assert_eq!(db.get_all_missed_message_markers(OWNER).unwrap().len(), 1);
    }

    #[test]
    fn test_markers_keep_insertion_order() {
        let db = Database::new(":memory:").unwrap();
        db.store_message_marker(OWNER, "!zzz:example.org", "$1").unwrap();
        db.store_message_marker(OWNER, "!aaa:example.org", "$2").unwrap();
        db.store_message_marker(OWNER, "!mmm:example.org", "$3").unwrap();

        let markers = db.get_all_missed_message_markers(OWNER).unwrap();
        assert_eq!(
            markers,
            vec![
                MissedMessage::new("!zzz:example.org", "$1"),
                MissedMessage::new("!aaa:example.org", "$2"),
                MissedMessage::new("!mmm:example.org", "$3"),
            ]
        );
    }

    #[test]
    fn test_clear_only_touches_owner() {
        let db = Database::new(":memory:").unwrap();
        db.store_message_marker(OWNER, "!r1:example.org", "$a").unwrap();
        db.store_message_marker(OWNER, "!r2:example.org", "$b").unwrap();
        db.store_message_marker("@other:example.org", "!r1:example.org", "$c").unwrap();

        assert_eq!(db.clear_all_missed_message_markers(OWNER).unwrap(), 2);
        assert!(db.get_all_missed_message_markers(OWNER).unwrap().is_empty());
        assert_eq!(
            db.get_message_marker("@other:example.org", "!r1:example.org").unwrap().as_deref(),
            Some("$c")
        );
    }

    #[test]
    fn test_room_can_be_marked_again_after_clear() {
        let db = Database::new(":memory:").unwrap();
        db.store_message_marker(OWNER, "!r1:example.org", "$a").unwrap();
        db.clear_all_missed_message_markers(OWNER).unwrap();

        assert!(db.store_message_marker(OWNER, "!r1:example.org", "$b").unwrap());
        assert_eq!(
            db.get_message_marker(OWNER, "!r1:example.org").unwrap().as_deref(),
            Some("$b")
        );
    }
}
