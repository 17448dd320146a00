use thiserror::Error;

use crate::config::ServerSpec;
use crate::remote::{run_remote, CommandError};

use super::parse::{
    parse_cpu_percent, parse_disk_usage, parse_memory_percent, service_is_active, DiskUsage,
};

const CPU_COMMAND: &str = "top -bn1 | grep 'Cpu(s)' | awk '{print $2 + $4}'";
const MEMORY_COMMAND: &str = "free | grep Mem";
const DISK_COMMAND: &str = "df -P";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStatus {
    pub name: String,
    pub up: bool,
}

/// Everything one pass learns about one server. A metric that could not be
/// read is simply absent and produces no evaluation.
#[derive(Debug, Clone, Default)]
pub struct ServerReadings {
    pub cpu: Option<f32>,
    pub memory: Option<f32>,
    pub disks: Vec<DiskUsage>,
    pub services: Vec<ServiceStatus>,
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sampling failed for {server}: {source}")]
    Unreachable {
        server: String,
        source: CommandError,
    },
}

/// Produces raw per-metric samples for one server per monitoring pass.
pub trait ReadingSource {
    async fn sample(&mut self, server: &ServerSpec) -> Result<ServerReadings, SampleError>;
}

/// Samples over SSH with the fixed command set. The first command failing
/// means the host is unreachable and the whole sample errors; once a
/// connection worked, later per-metric failures degrade to missing readings.
pub struct SshReadingSource {
    timeout_secs: u64,
}

impl SshReadingSource {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

impl ReadingSource for SshReadingSource {
    async fn sample(&mut self, server: &ServerSpec) -> Result<ServerReadings, SampleError> {
        let cpu_output = run_remote(server, CPU_COMMAND, self.timeout_secs)
            .await
            .map_err(|source| SampleError::Unreachable {
                server: server.nickname.clone(),
                source,
            })?;
        let cpu = parse_cpu_percent(&cpu_output.stdout);
        if cpu.is_none() {
            log::warn!(
                "metric_read_failed server={} metric=cpu status={}",
                server.nickname,
                cpu_output.status
            );
        }

        let memory = match run_remote(server, MEMORY_COMMAND, self.timeout_secs).await {
            Ok(output) => {
                let memory = parse_memory_percent(&output.stdout);
                if memory.is_none() {
                    log::warn!(
                        "metric_read_failed server={} metric=memory status={}",
                        server.nickname,
                        output.status
                    );
                }
                memory
            }
            Err(error) => {
                log::warn!(
                    "metric_read_failed server={} metric=memory error={}",
                    server.nickname,
                    error
                );
                None
            }
        };

        let disks = match run_remote(server, DISK_COMMAND, self.timeout_secs).await {
            Ok(output) => parse_disk_usage(&output.stdout),
            Err(error) => {
                log::warn!(
                    "metric_read_failed server={} metric=disk error={}",
                    server.nickname,
                    error
                );
                Vec::new()
            }
        };

        let mut services = Vec::with_capacity(server.services.len());
        for name in &server.services {
            let command = format!("systemctl is-active {}", name);
            match run_remote(server, &command, self.timeout_secs).await {
                Ok(output) => services.push(ServiceStatus {
                    name: name.clone(),
                    up: service_is_active(&output.stdout),
                }),
                Err(error) => {
                    log::warn!(
                        "metric_read_failed server={} metric=service:{} error={}",
                        server.nickname,
                        name,
                        error
                    );
                }
            }
        }

        Ok(ServerReadings {
            cpu,
            memory,
            disks,
            services,
        })
    }
}

#[cfg(test)]
pub(crate) use mock::MockReadingSource;
