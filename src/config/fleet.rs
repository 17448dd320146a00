use std::path::Path;

use serde::Deserialize;

use super::defaults::default_ssh_port;
use super::validate::ConfigError;

/// One monitored host from `servers.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSpec {
    pub nickname: String,
    pub hostname: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub key_path: Option<String>,
    /// systemd units to probe with `systemctl is-active`.
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FleetFile {
    #[serde(default)]
    servers: Vec<ServerSpec>,
}

pub fn load_fleet(path: impl AsRef<Path>) -> Result<Vec<ServerSpec>, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    let fleet: FleetFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path_str.clone(),
        source,
    })?;

    for server in &fleet.servers {
        if server.nickname.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "server nickname must not be empty in {}",
                path_str
            )));
        }
        if server.hostname.trim().is_empty() || server.username.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "server {} needs both hostname and username",
                server.nickname
            )));
        }
    }

    let duplicated = fleet
        .servers
        .iter()
        .enumerate()
        .find(|(index, server)| {
            fleet.servers[..*index]
                .iter()
                .any(|other| other.nickname == server.nickname)
        });
    if let Some((_, server)) = duplicated {
        return Err(ConfigError::Validation(format!(
            "duplicate server nickname {}",
            server.nickname
        )));
    }

    log::info!("fleet_loaded servers={} path={}", fleet.servers.len(), path_str);
    Ok(fleet.servers)
}
