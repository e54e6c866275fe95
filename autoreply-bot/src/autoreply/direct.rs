//! Direct-room classification from `m.direct` account data

use serde_json::Value;

/// Whether `room_id` appears in any room list of the `m.direct` payload.
///
/// The payload maps user ids to lists of room ids. Anything that does not
/// have that shape is skipped, so malformed data classifies as "not direct".
pub fn is_direct_room(account_data: &Value, room_id: &str) -> bool {
    let Some(by_user) = account_data.as_object() else {
        log::warn!("[autoreply] m.direct account data is not an object");
        return false;
    };

    by_user
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_str)
        .any(|room| room == room_id)
}
