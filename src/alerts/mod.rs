mod audit;
mod cooldown;
mod evaluator;
mod identity;
mod ledger;
mod record;
mod session;
mod store;

pub use audit::AuditLog;
pub use cooldown::{reset_all_cooldowns, should_notify};
pub use evaluator::{evaluate, Probe, Transition, TransitionKind};
pub use identity::{alert_id, AlertId};
pub use ledger::AlertLedger;
pub use record::AlertRecord;
pub(crate) use record::ledger_time;
pub use session::{FlushOutcome, NotificationSession, SessionError};
pub use store::{JsonFileStore, LedgerStore, LedgerStoreError};
