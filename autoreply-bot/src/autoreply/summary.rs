//! Missed-message summary sent when the owner comes back

use crate::models::MissedMessage;

pub const NOTHING_MISSED: &str = "You haven't missed any message while you were away.";
pub const SUMMARY_HEADER: &str =
    "While you were away, you have missed messages in the following DM(s):\n";

const MATRIX_TO: &str = "https://matrix.to/#/";

/// Render `markers` as a markdown list, keeping their order
pub fn generate_missed_messages_summary(markers: &[MissedMessage]) -> String {
    if markers.is_empty() {
        return NOTHING_MISSED.to_string();
    }

    let mut summary = SUMMARY_HEADER.to_string();
    for marker in markers {
        summary.push_str("\n* ");
        summary.push_str(&room_entry(marker));
    }
    summary
}

/// Room id as a matrix.to link (clients render it as a pill), followed by a
/// link to the first missed event. No `via` is needed: the owner is in the room.
fn room_entry(marker: &MissedMessage) -> String {
    format!(
        "[{room}]({base}{room}) ([view message]({base}{room}/{event}))",
        room = marker.room_id,
        event = marker.event_id,
        base = MATRIX_TO,
    )
}
