use crate::alerts::Probe;
use crate::config::Thresholds;
use crate::sampler::ServerReadings;

/// One reading turned into a threshold check plus the human-readable message
/// that goes into the ledger and the notifications.
#[derive(Debug, Clone)]
pub(crate) struct ProbeOutcome {
    pub kind: String,
    pub probe: Probe,
    pub message: String,
}

pub(crate) fn probes_for(readings: &ServerReadings, thresholds: &Thresholds) -> Vec<ProbeOutcome> {
    let mut outcomes = Vec::new();

    if let Some(value) = readings.cpu {
        outcomes.push(ProbeOutcome {
            kind: "cpu".to_string(),
            probe: Probe::Percent {
                value,
                threshold: thresholds.cpu,
            },
            message: format!(
                "CPU usage at {:.1}%, threshold is {}%",
                value, thresholds.cpu
            ),
        });
    }

    if let Some(value) = readings.memory {
        outcomes.push(ProbeOutcome {
            kind: "memory".to_string(),
            probe: Probe::Percent {
                value,
                threshold: thresholds.memory,
            },
            message: format!(
                "Memory usage at {:.1}%, threshold is {}%",
                value, thresholds.memory
            ),
        });
    }

    for disk in &readings.disks {
        outcomes.push(ProbeOutcome {
            kind: format!("disk:{}", disk.mount),
            probe: Probe::Percent {
                value: disk.used_percent,
                threshold: thresholds.disk,
            },
            message: format!(
                "Disk usage for {} at {:.1}%, threshold is {}%",
                disk.mount, disk.used_percent, thresholds.disk
            ),
        });
    }

    for service in &readings.services {
        outcomes.push(ProbeOutcome {
            kind: format!("service:{}", service.name),
            probe: Probe::ServiceDown { down: !service.up },
            message: format!("Service {} is down", service.name),
        });
    }

    outcomes
}
