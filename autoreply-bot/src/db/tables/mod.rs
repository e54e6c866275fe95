//! Database table modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for one table.
//! Every method takes the owner identity explicitly.

mod away_state;       // autoreply_user_away
mod management_rooms; // autoreply_management_rooms
mod missed_messages;  // autoreply_messages
