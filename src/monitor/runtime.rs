use teloxide::Bot;

use crate::advisor::DiskAdvisor;
use crate::alerts::{
    AlertLedger, AuditLog, FlushOutcome, JsonFileStore, NotificationSession, SessionError,
};
use crate::config::{Config, ServerSpec};
use crate::notify::{build_dispatcher, Dispatcher};
use crate::sampler::SshReadingSource;
use crate::subscribers::SubscriberStore;

/// Owns everything one monitoring pass needs: the ledger, the audit trail,
/// the session, the SSH sampler and the outbound channels. There is exactly
/// one of these per process and it is never shared with the bot loop, so
/// passes stay strictly sequential.
pub struct MonitorRuntime {
    config: Config,
    fleet: Vec<ServerSpec>,
    ledger: AlertLedger,
    session: NotificationSession,
    audit: AuditLog,
    dispatcher: Dispatcher,
    advisor: Option<DiskAdvisor>,
    source: SshReadingSource,
}

impl MonitorRuntime {
    pub fn new(
        config: Config,
        fleet: Vec<ServerSpec>,
        bot: Option<Bot>,
        subscribers: SubscriberStore,
    ) -> Self {
        let ledger = AlertLedger::load(Box::new(JsonFileStore::new(&config.alerts.ledger_path)));
        let audit = AuditLog::new(
            &config.alerts.audit_log_dir,
            config.alerts.audit_max_file_size_bytes,
            config.alerts.audit_retention_files,
        );
        let dispatcher = build_dispatcher(&config, bot, subscribers);
        let advisor = DiskAdvisor::from_config(&config.advisor);
        let source = SshReadingSource::new(config.command_timeout_secs);

        Self {
            config,
            fleet,
            ledger,
            session: NotificationSession::new(),
            audit,
            dispatcher,
            advisor,
            source,
        }
    }

    pub fn check_interval_secs(&self) -> u64 {
        self.config.check_interval_secs
    }

    pub async fn run_once(&mut self) -> Result<FlushOutcome, SessionError> {
        super::pass::run_pass(
            &self.config,
            &self.fleet,
            &mut self.source,
            &mut self.ledger,
            &mut self.session,
            &self.audit,
            &self.dispatcher,
            self.advisor.as_ref(),
        )
        .await
    }
}
