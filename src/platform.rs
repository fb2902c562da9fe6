//! Messaging-platform seam.
//!
//! The core only ever needs three outbound operations, so they sit behind a
//! trait and turn processing can be exercised without a live Telegram
//! connection.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId};

use crate::error::Result;

/// Outbound messaging operations used by the orchestrator and the command
/// router.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a new text message, returning its identifier.
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<MessageId>;

    /// Replaces the text of an existing message.
    async fn edit_message(&self, chat: ChatId, message: MessageId, text: &str) -> Result<()>;

    /// Deletes an existing message.
    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<()>;
}

/// Production messenger backed by the teloxide client.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<MessageId> {
        let message = self.bot.send_message(chat, text).await?;
        Ok(message.id)
    }

    async fn edit_message(&self, chat: ChatId, message: MessageId, text: &str) -> Result<()> {
        self.bot.edit_message_text(chat, message, text).await?;
        Ok(())
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<()> {
        self.bot.delete_message(chat, message).await?;
        Ok(())
    }
}
