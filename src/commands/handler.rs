use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::app_context::AppContext;

use super::command_def::MyCommands;

const WELCOME_TEXT: &str = "🎉 <b>Welcome to Fleetwatch!</b>\n\n\
You are now subscribed to server alerts. You will receive notifications when:\n\
• Server resources (CPU, Memory, Disk) exceed thresholds\n\
• Monitored services go down\n\
• Issues are resolved\n\n\
Available commands:\n\
/status - Check your subscription status\n\
/unsubscribe - Stop receiving alerts\n\
/help - Show this help message";

const HELP_TEXT: &str = "<b>Fleetwatch Bot Help</b>\n\n\
Available commands:\n\
/start or /subscribe - Subscribe to alerts\n\
/status - Check your subscription status\n\
/unsubscribe or /stop - Unsubscribe from alerts\n\
/help - Show this help message\n\n\
<i>Fleetwatch monitors your servers and sends alerts when issues are detected.</i>";

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: MyCommands,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let (username, first_name) = msg
        .from()
        .map(|user| (user.username.clone(), Some(user.first_name.clone())))
        .unwrap_or((None, None));

    let reply = match cmd {
        MyCommands::Start | MyCommands::Subscribe => {
            if app_context
                .subscribers
                .add(chat_id.0, username, first_name, Utc::now())
                .await
            {
                WELCOME_TEXT.to_string()
            } else {
                "You are already subscribed to Fleetwatch alerts! 👍".to_string()
            }
        }
        MyCommands::Unsubscribe | MyCommands::Stop => {
            if app_context.subscribers.remove(chat_id.0).await {
                "You have been unsubscribed from Fleetwatch alerts. Use /start to subscribe again."
                    .to_string()
            } else {
                "You are not currently subscribed.".to_string()
            }
        }
        MyCommands::Status => match app_context.subscribers.get(chat_id.0).await {
            Some(subscriber) => format!(
                "<b>Your Subscription Status</b>\n\n\
                 ✅ <b>Status:</b> Active\n\
                 📅 <b>Subscribed since:</b> {}\n\
                 👥 <b>Total subscribers:</b> {}",
                subscriber.subscribed_at.format("%Y-%m-%d %H:%M:%S"),
                app_context.subscribers.count().await
            ),
            None => "❌ You are not subscribed. Use /start to subscribe.".to_string(),
        },
        MyCommands::Help => HELP_TEXT.to_string(),
    };

    bot.send_message(chat_id, reply)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
