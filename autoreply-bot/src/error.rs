//! Crate-wide error type

use thiserror::Error;

/// Errors surfaced by the store, the chat client and the settings loader.
///
/// Skipped auto-replies and unknown commands are not errors; they never
/// reach this type.
#[derive(Debug, Error)]
pub enum BotError {
    /// SQLite read or write failed
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A management room is already bound to this owner
    #[error("a management room is already stored for {owner}")]
    DuplicateManagementRoom { owner: String },

    /// The chat client could not deliver a request
    #[error("transport error: {0}")]
    Transport(String),

    /// Settings file could not be read or parsed
    #[error("settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
