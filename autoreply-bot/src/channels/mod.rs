pub mod console;
pub mod dispatcher;
pub mod types;

pub use dispatcher::MessageDispatcher;
pub use types::{ChatClient, InboundMessage, OutgoingReply, RoomCreation};
