use std::path::Path;

use super::{schema::Config, validate::ConfigError};

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path_str,
        source,
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::load_config;
    use crate::config::ConfigError;

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).expect("write config");
        (dir, path)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let (_dir, path) = write_config("");
        let config = load_config(&path).expect("load");
        assert_eq!(config.check_interval_secs, 300);
        assert_eq!(config.thresholds.cpu, 80.0);
        assert_eq!(config.thresholds.disk, 85.0);
        assert_eq!(config.alerts.cooldown_hours, 8);
        assert!(!config.email.enabled);
        assert!(!config.telegram.enabled);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let (_dir, path) = write_config("[thresholds]\ncpu = 140.0\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn enabled_email_requires_smtp_settings() {
        let (_dir, path) = write_config("[email]\nenabled = true\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn enabled_telegram_requires_a_token() {
        let (_dir, path) = write_config("[telegram]\nenabled = true\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn full_config_parses() {
        let (_dir, path) = write_config(
            r#"
check_interval_secs = 120
command_timeout_secs = 15

[thresholds]
cpu = 90.0
memory = 85.0
disk = 92.5

[alerts]
cooldown_hours = 4
ledger_path = "state/alert_status.json"

[email]
enabled = true
smtp_server = "smtp.example.com"
smtp_port = 465
use_tls = true
username = "monitor@example.com"
password = "secret"
sender = "monitor@example.com"
recipients = ["ops@example.com"]

[telegram]
enabled = true
bot_token = "123:abc"

[advisor]
enabled = true
api_key = "sk-test"
"#,
        );
        let config = load_config(&path).expect("load");
        assert_eq!(config.alerts.cooldown_hours, 4);
        assert_eq!(config.email.smtp_port, 465);
        assert_eq!(config.cooldown(), chrono::Duration::hours(4));
    }
}
