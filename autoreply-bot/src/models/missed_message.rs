/// First message received in a direct room while the owner was away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedMessage {
    pub room_id: String,
    pub event_id: String,
}

impl MissedMessage {
    pub fn new(room_id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            event_id: event_id.into(),
        }
    }
}
