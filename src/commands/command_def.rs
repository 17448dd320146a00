use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum MyCommands {
    #[command(description = "Subscribe to fleet alerts.")]
    Start,
    #[command(description = "Subscribe to fleet alerts.")]
    Subscribe,
    #[command(description = "Check your subscription status.")]
    Status,
    #[command(description = "Stop receiving alerts.")]
    Unsubscribe,
    #[command(description = "Stop receiving alerts.")]
    Stop,
    #[command(description = "Show this help message.")]
    Help,
}
