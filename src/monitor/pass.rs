use chrono::Utc;

use crate::advisor::DiskAdvisor;
use crate::alerts::{
    evaluate, AlertLedger, AuditLog, FlushOutcome, NotificationSession, Probe, SessionError,
    TransitionKind,
};
use crate::config::{Config, ServerSpec};
use crate::notify::Dispatcher;
use crate::sampler::ReadingSource;

use super::probes::probes_for;

/// One full monitoring pass: open the session, walk the fleet, evaluate
/// every reading against the ledger, then flush the session into outbound
/// batches.
///
/// Per-server sampling failures skip that server and keep the pass going;
/// its open alerts are neither refreshed nor resolved and simply age. A
/// `SessionError` here means the session contract was violated, which is a
/// bug in the caller, not a runtime condition.
#[allow(clippy::too_many_arguments)]
pub async fn run_pass<S: ReadingSource>(
    config: &Config,
    fleet: &[ServerSpec],
    source: &mut S,
    ledger: &mut AlertLedger,
    session: &mut NotificationSession,
    audit: &AuditLog,
    dispatcher: &Dispatcher,
    advisor: Option<&DiskAdvisor>,
) -> Result<FlushOutcome, SessionError> {
    let cooldown = config.cooldown();
    session.start()?;

    let mut new_count = 0u32;
    let mut recurring_count = 0u32;
    let mut unchanged_count = 0u32;
    let mut resolved_count = 0u32;
    let mut skipped_servers = 0u32;

    for server in fleet {
        let readings = match source.sample(server).await {
            Ok(readings) => readings,
            Err(error) => {
                log::warn!(
                    "server_sample_failed server={} hostname={} error={}",
                    server.nickname,
                    server.hostname,
                    error
                );
                skipped_servers += 1;
                continue;
            }
        };

        let now = Utc::now();
        for outcome in probes_for(&readings, &config.thresholds) {
            let evaluated = evaluate(
                ledger,
                audit,
                cooldown,
                &server.nickname,
                &server.hostname,
                &outcome.kind,
                outcome.probe,
                &outcome.message,
                now,
            );

            let mut transition = match evaluated {
                Ok(Some(transition)) => transition,
                Ok(None) => continue,
                Err(error) => {
                    log::error!(
                        "ledger_persist_failed server={} type={} error={}",
                        server.nickname,
                        outcome.kind,
                        error
                    );
                    continue;
                }
            };

            match transition.kind {
                TransitionKind::New => new_count += 1,
                TransitionKind::Recurring => recurring_count += 1,
                TransitionKind::Unchanged => unchanged_count += 1,
                TransitionKind::Resolved => resolved_count += 1,
            }

            if transition.kind == TransitionKind::New {
                if let Some(advisor) = advisor {
                    if let Some(mount) = outcome.kind.strip_prefix("disk:") {
                        if let Probe::Percent { value, .. } = outcome.probe {
                            transition.note = advisor
                                .disk_note(server, mount, value, config.command_timeout_secs)
                                .await;
                        }
                    }
                }
            }

            session.record(transition)?;
        }
    }

    let outcome = session.end(ledger, dispatcher, cooldown, Utc::now()).await?;

    tracing::info!(
        target: "monitor",
        servers = fleet.len(),
        skipped = skipped_servers,
        new = new_count,
        recurring = recurring_count,
        unchanged = unchanged_count,
        resolved = resolved_count,
        firing_sent = outcome.firing_sent,
        firing_suppressed = outcome.firing_suppressed,
        resolved_sent = outcome.resolved_sent,
        channels_delivered = outcome.channels_delivered,
        open_alerts = ledger.open_count(),
        "pass_complete"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::alerts::{AlertLedger, AuditLog, NotificationSession};
    use crate::alerts::JsonFileStore;
    use crate::config::{Config, ServerSpec};
    use crate::notify::{AlertBatch, BatchKind, Dispatcher, NotifyChannel, NotifyError};
    use crate::sampler::{DiskUsage, MockReadingSource, ServerReadings, ServiceStatus};

    use super::run_pass;

    struct RecordingChannel {
        sent: Arc<Mutex<Vec<AlertBatch>>>,
    }

    #[async_trait]
    impl NotifyChannel for RecordingChannel {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send_batch(&self, batch: &AlertBatch) -> Result<(), NotifyError> {
            self.sent.lock().expect("sent lock").push(batch.clone());
            Ok(())
        }
    }

    fn test_config(dir: &std::path::Path) -> Config {
        let raw = format!(
            "[alerts]\nledger_path = {:?}\naudit_log_dir = {:?}\n",
            dir.join("alert_status.json").display().to_string(),
            dir.join("logs").display().to_string(),
        );
        let config: Config = toml::from_str(&raw).expect("config");
        config
    }

    fn server(nickname: &str) -> ServerSpec {
        ServerSpec {
            nickname: nickname.to_string(),
            hostname: format!("{}.example.net", nickname),
            port: 22,
            username: "monitor".to_string(),
            key_path: None,
            services: Vec::new(),
        }
    }

    fn healthy() -> ServerReadings {
        ServerReadings {
            cpu: Some(10.0),
            memory: Some(20.0),
            disks: vec![DiskUsage { mount: "/".to_string(), used_percent: 30.0 }],
            services: vec![ServiceStatus { name: "nginx".to_string(), up: true }],
        }
    }

    fn degraded() -> ServerReadings {
        ServerReadings {
            cpu: Some(95.0),
            memory: Some(20.0),
            disks: vec![DiskUsage { mount: "/".to_string(), used_percent: 30.0 }],
            services: vec![ServiceStatus { name: "nginx".to_string(), up: false }],
        }
    }

    struct PassHarness {
        config: Config,
        ledger: AlertLedger,
        audit: AuditLog,
        session: NotificationSession,
        dispatcher: Dispatcher,
        sent: Arc<Mutex<Vec<AlertBatch>>>,
        _dir: tempfile::TempDir,
    }

    fn pass_harness() -> PassHarness {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = test_config(dir.path());
        let ledger = AlertLedger::load(Box::new(JsonFileStore::new(&config.alerts.ledger_path)));
        let audit = AuditLog::new(
            &config.alerts.audit_log_dir,
            config.alerts.audit_max_file_size_bytes,
            config.alerts.audit_retention_files,
        );
        let sent = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new(vec![Box::new(RecordingChannel { sent: sent.clone() })]);
        PassHarness {
            config,
            ledger,
            audit,
            session: NotificationSession::new(),
            dispatcher,
            sent,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn degraded_then_recovered_sends_firing_then_resolved() {
        let mut h = pass_harness();
        let fleet = vec![server("web1")];
        let mut source = MockReadingSource::new(vec![Ok(degraded()), Ok(healthy())]);

        let first = run_pass(
            &h.config,
            &fleet,
            &mut source,
            &mut h.ledger,
            &mut h.session,
            &h.audit,
            &h.dispatcher,
            None,
        )
        .await
        .expect("first pass");
        assert!(first.firing_sent);
        assert!(!first.resolved_sent);
        assert_eq!(h.ledger.open_count(), 2);

        let second = run_pass(
            &h.config,
            &fleet,
            &mut source,
            &mut h.ledger,
            &mut h.session,
            &h.audit,
            &h.dispatcher,
            None,
        )
        .await
        .expect("second pass");
        assert!(second.resolved_sent);
        assert_eq!(h.ledger.open_count(), 0);

        let batches = h.sent.lock().expect("sent lock");
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].kind, BatchKind::Firing);
        assert_eq!(batches[0].item_count(), 2);
        assert_eq!(batches[1].kind, BatchKind::Resolved);
        assert_eq!(batches[1].item_count(), 2);
    }

    #[tokio::test]
    async fn unreachable_server_neither_resolves_nor_refreshes() {
        let mut h = pass_harness();
        let fleet = vec![server("web1")];
        let mut source = MockReadingSource::new(vec![Ok(degraded()), Err(())]);

        run_pass(
            &h.config,
            &fleet,
            &mut source,
            &mut h.ledger,
            &mut h.session,
            &h.audit,
            &h.dispatcher,
            None,
        )
        .await
        .expect("first pass");
        let open_before: Vec<String> = h
            .ledger
            .list_open()
            .iter()
            .map(|record| record.kind.clone())
            .collect();

        let second = run_pass(
            &h.config,
            &fleet,
            &mut source,
            &mut h.ledger,
            &mut h.session,
            &h.audit,
            &h.dispatcher,
            None,
        )
        .await
        .expect("second pass");

        // The unreachable pass produced no transitions at all: nothing fired,
        // nothing resolved, the open set is untouched.
        assert!(!second.firing_sent);
        assert!(!second.resolved_sent);
        assert!(!second.cooldowns_reset);
        let open_after: Vec<String> = h
            .ledger
            .list_open()
            .iter()
            .map(|record| record.kind.clone())
            .collect();
        assert_eq!(open_before, open_after);
    }

    #[tokio::test]
    async fn healthy_fleet_sends_nothing() {
        let mut h = pass_harness();
        let fleet = vec![server("web1"), server("db1")];
        let mut source = MockReadingSource::new(vec![Ok(healthy()), Ok(healthy())]);

        let outcome = run_pass(
            &h.config,
            &fleet,
            &mut source,
            &mut h.ledger,
            &mut h.session,
            &h.audit,
            &h.dispatcher,
            None,
        )
        .await
        .expect("pass");

        assert!(!outcome.firing_sent);
        assert!(!outcome.resolved_sent);
        assert!(!outcome.cooldowns_reset);
        assert!(h.sent.lock().expect("sent lock").is_empty());
    }
}
