mod defaults;
mod fleet;
mod io;
mod schema;
mod validate;

pub use fleet::{load_fleet, ServerSpec};
pub use io::load_config;
pub use schema::{AdvisorConfig, AlertsConfig, Config, EmailConfig, TelegramConfig, Thresholds};
pub use validate::ConfigError;
