//! Away-state policy: decide whether an incoming message gets the auto-reply
//!
//! A message gets exactly one auto-reply per room while the owner is away.
//! The first such message is remembered as a marker and reported in the
//! summary when the owner comes back.

pub mod commands;
pub mod direct;
pub mod summary;

use crate::bot::AutoReplyBot;
use crate::channels::{ChatClient, InboundMessage, OutgoingReply};
use crate::error::Result;

/// Why a message did not get an auto-reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Sent by the owner
    OwnMessage,
    NotAway,
    /// The room already has a marker
    AlreadyReplied,
    NotDirect,
    /// Another event claimed the room's marker in the meantime
    LostRace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoReplyOutcome {
    Replied,
    /// Marker recorded but the reply could not be delivered
    ReplyFailed,
    Skipped(SkipReason),
}

/// Send the configured auto-reply to `message` if the owner is away and the
/// room is a DM that has not been answered yet.
///
/// The marker is claimed before replying. Storage failures are returned;
/// delivery failures are only logged.
pub async fn auto_reply(bot: &AutoReplyBot, message: &InboundMessage) -> Result<AutoReplyOutcome> {
    let owner = bot.owner();
    let db = bot.db();

    if message.sender_id == owner {
        return Ok(skip(message, SkipReason::OwnMessage));
    }
    if !db.is_away(owner)? {
        return Ok(skip(message, SkipReason::NotAway));
    }
    if db.get_message_marker(owner, &message.room_id)?.is_some() {
        return Ok(skip(message, SkipReason::AlreadyReplied));
    }
    if !is_direct(bot.client(), &message.room_id).await {
        return Ok(skip(message, SkipReason::NotDirect));
    }
    if !db.store_message_marker(owner, &message.room_id, &message.event_id)? {
        return Ok(skip(message, SkipReason::LostRace));
    }

    let text = bot.settings().current().message;
    match bot.client().send_reply(OutgoingReply::plain(message, text)).await {
        Ok(()) => {
            log::info!(
                "[autoreply] Auto-replied to {} in {} (event {})",
                message.sender_id,
                message.room_id,
                message.event_id
            );
            Ok(AutoReplyOutcome::Replied)
        }
        Err(e) => {
            log::warn!("[autoreply] Failed to auto-reply in {}: {}", message.room_id, e);
            Ok(AutoReplyOutcome::ReplyFailed)
        }
    }
}

fn skip(message: &InboundMessage, reason: SkipReason) -> AutoReplyOutcome {
    log::debug!(
        "[autoreply] No auto-reply for {} in {}: {:?}",
        message.event_id,
        message.room_id,
        reason
    );
    AutoReplyOutcome::Skipped(reason)
}

/// A failed account-data lookup counts as "not direct": better to miss a DM
/// than to auto-reply into a group room.
async fn is_direct(client: &dyn ChatClient, room_id: &str) -> bool {
    match client.direct_rooms().await {
        Ok(data) => direct::is_direct_room(&data, room_id),
        Err(e) => {
            log::warn!("[autoreply] m.direct lookup failed, treating {} as not direct: {}", room_id, e);
            false
        }
    }
}
