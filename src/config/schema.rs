use chrono::Duration;
use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default = "default_servers_path")]
    pub servers_path: String,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

impl Config {
    pub fn cooldown(&self) -> Duration {
        Duration::hours(self.alerts.cooldown_hours as i64)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_threshold_cpu")]
    pub cpu: f32,
    #[serde(default = "default_threshold_memory")]
    pub memory: f32,
    #[serde(default = "default_threshold_disk")]
    pub disk: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u64,
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,
    #[serde(default = "default_audit_log_dir")]
    pub audit_log_dir: String,
    #[serde(default = "default_audit_max_file_size_bytes")]
    pub audit_max_file_size_bytes: u64,
    #[serde(default = "default_audit_retention_files")]
    pub audit_retention_files: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_subscribers_path")]
    pub subscribers_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_advisor_model")]
    pub model: String,
}
