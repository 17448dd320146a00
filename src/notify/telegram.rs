use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

use crate::subscribers::SubscriberStore;

use super::batch::AlertBatch;
use super::dispatcher::{NotifyChannel, NotifyError};

/// Delivers one batch to every persisted subscriber. Individual chat
/// failures are logged; the channel counts as delivered when at least one
/// subscriber received the message.
pub struct TelegramChannel {
    bot: Bot,
    subscribers: SubscriberStore,
}

impl TelegramChannel {
    pub fn new(bot: Bot, subscribers: SubscriberStore) -> Self {
        Self { bot, subscribers }
    }
}

#[async_trait]
impl NotifyChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send_batch(&self, batch: &AlertBatch) -> Result<(), NotifyError> {
        let recipients = self.subscribers.list().await;
        if recipients.is_empty() {
            return Err(NotifyError::Telegram("no subscribers".to_string()));
        }

        let text = batch.render_text();
        let mut sent = 0usize;
        for subscriber in &recipients {
            match self
                .bot
                .send_message(ChatId(subscriber.chat_id), text.clone())
                .parse_mode(ParseMode::Html)
                .await
            {
                Ok(_) => sent += 1,
                Err(error) => {
                    log::warn!(
                        "telegram_send_failed chat_id={} error={}",
                        subscriber.chat_id,
                        error
                    );
                }
            }
        }

        log::info!(
            "telegram_batch_delivered sent={} subscribers={}",
            sent,
            recipients.len()
        );
        if sent > 0 {
            Ok(())
        } else {
            Err(NotifyError::Telegram(format!(
                "all {} deliveries failed",
                recipients.len()
            )))
        }
    }
}
