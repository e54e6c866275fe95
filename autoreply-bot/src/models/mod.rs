mod away_state;
mod missed_message;

pub use away_state::AwayState;
pub use missed_message::MissedMessage;
