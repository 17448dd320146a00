mod batch;
mod dispatcher;
mod email;
mod render;
mod telegram;

pub use batch::{AlertBatch, BatchKind};
pub use dispatcher::{Dispatcher, NotifyChannel, NotifyError};
pub use email::EmailChannel;
pub use telegram::TelegramChannel;

use teloxide::Bot;

use crate::config::Config;
use crate::subscribers::SubscriberStore;

/// Assemble the dispatcher from whatever channels the configuration enables.
/// The Telegram channel additionally needs a live bot handle; without one it
/// is skipped even when enabled.
pub fn build_dispatcher(
    config: &Config,
    bot: Option<Bot>,
    subscribers: SubscriberStore,
) -> Dispatcher {
    let mut channels: Vec<Box<dyn NotifyChannel>> = Vec::new();

    if config.email.enabled {
        channels.push(Box::new(EmailChannel::new(config.email.clone())));
    }
    if config.telegram.enabled {
        if let Some(bot) = bot {
            channels.push(Box::new(TelegramChannel::new(bot, subscribers)));
        }
    }

    if channels.is_empty() {
        log::warn!("no_notification_channels_enabled alerts_will_only_reach_logs=true");
    }
    Dispatcher::new(channels)
}
