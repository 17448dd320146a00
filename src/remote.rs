use thiserror::Error;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::config::ServerSpec;

const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("remote command timed out after {timeout_secs}s on {host}: {cmd}")]
    Timeout {
        host: String,
        cmd: String,
        timeout_secs: u64,
    },
    #[error("failed to run ssh for {host}: {source}")]
    Io {
        host: String,
        source: std::io::Error,
    },
}

/// Run one shell command on a remote host through the local ssh client.
/// BatchMode keeps a broken key setup from hanging on a password prompt.
pub async fn run_remote(
    server: &ServerSpec,
    command: &str,
    timeout_secs: u64,
) -> Result<CommandOutput, CommandError> {
    let mut ssh = Command::new("ssh");
    ssh.arg("-o")
        .arg("BatchMode=yes")
        .arg("-o")
        .arg("StrictHostKeyChecking=accept-new")
        .arg("-o")
        .arg(format!("ConnectTimeout={}", CONNECT_TIMEOUT_SECS))
        .arg("-p")
        .arg(server.port.to_string());
    if let Some(key_path) = &server.key_path {
        ssh.arg("-i").arg(key_path);
    }
    ssh.arg(format!("{}@{}", server.username, server.hostname));
    ssh.arg(command);

    let output = timeout(Duration::from_secs(timeout_secs), ssh.output())
        .await
        .map_err(|_| CommandError::Timeout {
            host: server.hostname.clone(),
            cmd: command.to_string(),
            timeout_secs,
        })?
        .map_err(|source| CommandError::Io {
            host: server.hostname.clone(),
            source,
        })?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status.code().unwrap_or(-1),
    })
}
