use crate::autoreply::{self, commands, AutoReplyOutcome};
use crate::bot::AutoReplyBot;
use crate::channels::types::InboundMessage;
use crate::error::Result;
use std::sync::Arc;

/// What the dispatcher did with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Management room message; lists the commands that ran (possibly none)
    Commands(Vec<commands::ManagementCommand>),
    AutoReply(AutoReplyOutcome),
    /// Bot is shut down
    Ignored,
}

/// Routes inbound messages to management commands or the away-state policy
pub struct MessageDispatcher {
    bot: Arc<AutoReplyBot>,
}

impl MessageDispatcher {
    pub fn new(bot: Arc<AutoReplyBot>) -> Self {
        Self { bot }
    }

    pub async fn dispatch(&self, message: InboundMessage) -> Result<DispatchResult> {
        if !self.bot.is_running() {
            log::warn!("[dispatcher] Bot stopped, dropping event {}", message.event_id);
            return Ok(DispatchResult::Ignored);
        }

        if message.room_id == self.bot.management_room() {
            return self.handle_management_message(&message).await;
        }

        let outcome = autoreply::auto_reply(&self.bot, &message).await?;
        Ok(DispatchResult::AutoReply(outcome))
    }

    async fn handle_management_message(&self, message: &InboundMessage) -> Result<DispatchResult> {
        let parsed = commands::parse(&message.body);
        for command in &parsed {
            log::info!("[dispatcher] Running {} from {}", command, message.sender_id);
            commands::execute(*command, &self.bot, message).await?;
        }
        Ok(DispatchResult::Commands(parsed))
    }
}
