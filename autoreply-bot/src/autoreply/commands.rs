//! Management room commands: `!clear`, `!away`, `!back`

use crate::autoreply::summary::generate_missed_messages_summary;
use crate::bot::AutoReplyBot;
use crate::channels::{InboundMessage, OutgoingReply};
use crate::error::Result;
use std::fmt;

pub const CLEARED_REPLY: &str = "Cleared messages";
pub const AWAY_REPLY: &str = "Your status has been updated. Have a nice break!";
pub const BACK_REPLY: &str = "Your status has been updated. Welcome back!\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagementCommand {
    /// Drop every marker without touching the away flag. Debug aid.
    Clear,
    Away,
    /// Mark back, send the summary, then drop the markers
    Back,
}

impl ManagementCommand {
    pub fn prefix(self) -> &'static str {
        match self {
            ManagementCommand::Clear => "!clear",
            ManagementCommand::Away => "!away",
            ManagementCommand::Back => "!back",
        }
    }
}

impl fmt::Display for ManagementCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Every command whose prefix `body` starts with.
///
/// Prefixes are checked independently, in `!clear`, `!away`, `!back` order,
/// and all matches run. Unknown text yields nothing.
pub fn parse(body: &str) -> Vec<ManagementCommand> {
    [
        ManagementCommand::Clear,
        ManagementCommand::Away,
        ManagementCommand::Back,
    ]
    .into_iter()
    .filter(|cmd| body.starts_with(cmd.prefix()))
    .collect()
}

/// Run `command` for the owner and send its confirmation in reply to `message`
pub async fn execute(
    command: ManagementCommand,
    bot: &AutoReplyBot,
    message: &InboundMessage,
) -> Result<()> {
    let owner = bot.owner();
    let db = bot.db();

    match command {
        ManagementCommand::Clear => {
            let removed = db.clear_all_missed_message_markers(owner)?;
            log::info!("[commands] Cleared {} missed message(s) for {}", removed, owner);
            bot.client()
                .send_reply(OutgoingReply::plain(message, CLEARED_REPLY))
                .await
        }
        ManagementCommand::Away => {
            db.update_away_state(owner, true)?;
            log::info!("[commands] {} is now {}", owner, db.away_state(owner)?);
            bot.client()
                .send_reply(OutgoingReply::plain(message, AWAY_REPLY))
                .await
        }
        ManagementCommand::Back => {
            db.update_away_state(owner, false)?;
            let markers = db.get_all_missed_message_markers(owner)?;
            log::info!(
                "[commands] {} is now {}, {} room(s) with missed messages",
                owner,
                db.away_state(owner)?,
                markers.len()
            );

            let body = format!("{}{}", BACK_REPLY, generate_missed_messages_summary(&markers));
            bot.client()
                .send_reply(OutgoingReply::markdown(message, body))
                .await?;

            // Only once the summary went out, so a failed send can be retried
            db.clear_all_missed_message_markers(owner)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::test_support::*;
    use crate::error::BotError;
    use crate::models::{AwayState, MissedMessage};

    fn command_message(body: &str) -> InboundMessage {
        InboundMessage {
            sender_id: OWNER.to_string(),
            room_id: MANAGEMENT_ROOM.to_string(),
            event_id: "$cmd".to_string(),
            body: body.to_string(),
            is_markdown: false,
        }
    }

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(parse("!away"), vec![ManagementCommand::Away]);
        assert_eq!(parse("!away for lunch"), vec![ManagementCommand::Away]);
        assert_eq!(parse("!back"), vec![ManagementCommand::Back]);
        assert_eq!(parse("!clear"), vec![ManagementCommand::Clear]);
    }

    #[test]
    fn test_parse_ignores_unknown_text() {
        assert!(parse("hello").is_empty());
        assert!(parse(" !away").is_empty());
        assert!(parse("!AWAY").is_empty());
        assert!(parse("").is_empty());
    }

    #[tokio::test]
    async fn test_away_is_idempotent() {
        let (bot, client) = bot_with_direct_rooms(&[]).await;
        let message = command_message("!away");

        execute(ManagementCommand::Away, &bot, &message).await.unwrap();
        execute(ManagementCommand::Away, &bot, &message).await.unwrap();

        assert_eq!(bot.db().away_state(OWNER).unwrap(), AwayState::Away);
        let replies = client.replies();
        assert_eq!(replies.len(), 2);
        assert!(replies.iter().all(|r| r.body == AWAY_REPLY && !r.markdown));
    }

    #[tokio::test]
    async fn test_away_storage_failure_sends_nothing() {
        let (bot, client) = bot_with_direct_rooms(&[]).await;
        bot.db()
            .conn
            .lock()
            .execute("DROP TABLE autoreply_user_away", [])
            .unwrap();

        let result = execute(ManagementCommand::Away, &bot, &command_message("!away")).await;

        assert!(matches!(result, Err(BotError::Storage(_))));
        assert!(client.replies().is_empty());
    }

    #[tokio::test]
    async fn test_back_sends_summary_then_clears() {
        let (bot, client) = bot_with_direct_rooms(&[]).await;
        bot.db().update_away_state(OWNER, true).unwrap();
        bot.db().store_message_marker(OWNER, "!r1:example.org", "$a").unwrap();

        execute(ManagementCommand::Back, &bot, &command_message("!back"))
            .await
            .unwrap();

        assert!(!bot.db().is_away(OWNER).unwrap());
        assert!(bot.db().get_all_missed_message_markers(OWNER).unwrap().is_empty());

        let replies = client.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].markdown);
        assert_eq!(replies[0].in_reply_to, "$cmd");
        assert!(replies[0].body.starts_with(BACK_REPLY));
        assert!(replies[0].body.contains("https://matrix.to/#/!r1:example.org/$a"));
    }

    #[tokio::test]
    async fn test_back_with_nothing_missed() {
        let (bot, client) = bot_with_direct_rooms(&[]).await;

        execute(ManagementCommand::Back, &bot, &command_message("!back"))
            .await
            .unwrap();

        assert_eq!(
            client.replies()[0].body,
            format!("{}{}", BACK_REPLY, crate::autoreply::summary::NOTHING_MISSED)
        );
    }

    #[tokio::test]
    async fn test_failed_summary_keeps_markers() {
        let (bot, client) = bot_with_direct_rooms(&[]).await;
        bot.db().store_message_marker(OWNER, "!r1:example.org", "$a").unwrap();
        *client.fail_sends.lock() = true;

        let result = execute(ManagementCommand::Back, &bot, &command_message("!back")).await;

        assert!(matches!(result, Err(BotError::Transport(_))));
        assert_eq!(
            bot.db().get_all_missed_message_markers(OWNER).unwrap(),
            vec![MissedMessage::new("!r1:example.org", "$a")]
        );
    }

    #[tokio::test]
    async fn test_clear_keeps_away_state() {
        let (bot, client) = bot_with_direct_rooms(&[]).await;
        bot.db().update_away_state(OWNER, true).unwrap();
        bot.db().store_message_marker(OWNER, "!r1:example.org", "$a").unwrap();

        execute(ManagementCommand::Clear, &bot, &command_message("!clear"))
            .await
            .unwrap();

        assert!(bot.db().is_away(OWNER).unwrap());
        assert!(bot.db().get_all_missed_message_markers(OWNER).unwrap().is_empty());
        assert_eq!(client.replies()[0].body, CLEARED_REPLY);
    }
}
