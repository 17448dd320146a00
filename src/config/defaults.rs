use super::schema::{AdvisorConfig, AlertsConfig, EmailConfig, TelegramConfig, Thresholds};

pub(super) fn default_check_interval_secs() -> u64 {
    300
}

pub(super) fn default_command_timeout_secs() -> u64 {
    30
}

pub(super) fn default_servers_path() -> String {
    "servers.toml".to_string()
}

pub(super) fn default_threshold_cpu() -> f32 {
    80.0
}

pub(super) fn default_threshold_memory() -> f32 {
    80.0
}

pub(super) fn default_threshold_disk() -> f32 {
    85.0
}

pub(super) fn default_cooldown_hours() -> u64 {
    8
}

pub(super) fn default_ledger_path() -> String {
    "data/alert_status.json".to_string()
}

pub(super) fn default_audit_log_dir() -> String {
    "logs".to_string()
}

pub(super) fn default_audit_max_file_size_bytes() -> u64 {
    10 * 1024 * 1024
}

pub(super) fn default_audit_retention_files() -> usize {
    7
}

pub(super) fn default_smtp_port() -> u16 {
    587
}

pub(super) fn default_use_tls() -> bool {
    true
}

pub(super) fn default_subscribers_path() -> String {
    "data/subscribers.json".to_string()
}

pub(super) fn default_advisor_model() -> String {
    "deepseek/deepseek-r1-0528:free".to_string()
}

pub(super) fn default_ssh_port() -> u16 {
    22
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: default_threshold_cpu(),
            memory: default_threshold_memory(),
            disk: default_threshold_disk(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            cooldown_hours: default_cooldown_hours(),
            ledger_path: default_ledger_path(),
            audit_log_dir: default_audit_log_dir(),
            audit_max_file_size_bytes: default_audit_max_file_size_bytes(),
            audit_retention_files: default_audit_retention_files(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: String::new(),
            smtp_port: default_smtp_port(),
            use_tls: default_use_tls(),
            username: String::new(),
            password: String::new(),
            sender: String::new(),
            recipients: Vec::new(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            subscribers_path: default_subscribers_path(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            model: default_advisor_model(),
        }
    }
}
