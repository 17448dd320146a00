use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "check_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "command_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.servers_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "servers_path must not be empty".to_string(),
            ));
        }

        validate_percentage("thresholds.cpu", self.thresholds.cpu)?;
        validate_percentage("thresholds.memory", self.thresholds.memory)?;
        validate_percentage("thresholds.disk", self.thresholds.disk)?;

        if self.alerts.cooldown_hours == 0 {
            return Err(ConfigError::Validation(
                "alerts.cooldown_hours must be greater than 0".to_string(),
            ));
        }
        if self.alerts.ledger_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "alerts.ledger_path must not be empty".to_string(),
            ));
        }
        if self.alerts.audit_log_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "alerts.audit_log_dir must not be empty".to_string(),
            ));
        }
        if self.alerts.audit_max_file_size_bytes == 0 {
            return Err(ConfigError::Validation(
                "alerts.audit_max_file_size_bytes must be greater than 0".to_string(),
            ));
        }
        if self.alerts.audit_retention_files == 0 {
            return Err(ConfigError::Validation(
                "alerts.audit_retention_files must be greater than 0".to_string(),
            ));
        }

        if self.email.enabled {
            if self.email.smtp_server.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "email.smtp_server must not be empty when email.enabled is true".to_string(),
                ));
            }
            if self.email.sender.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "email.sender must not be empty when email.enabled is true".to_string(),
                ));
            }
            if self.email.recipients.is_empty() {
                return Err(ConfigError::Validation(
                    "email.recipients must not be empty when email.enabled is true".to_string(),
                ));
            }
        }

        if self.telegram.enabled {
            if self.telegram.bot_token.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "telegram.bot_token must not be empty when telegram.enabled is true"
                        .to_string(),
                ));
            }
            if self.telegram.subscribers_path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "telegram.subscribers_path must not be empty when telegram.enabled is true"
                        .to_string(),
                ));
            }
        }

        if self.advisor.enabled && self.advisor.api_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "advisor.api_key must not be empty when advisor.enabled is true".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_percentage(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}
