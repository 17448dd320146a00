use chrono::{DateTime, Duration, Utc};

use super::audit::AuditLog;
use super::cooldown::should_notify;
use super::identity::alert_id;
use super::ledger::AlertLedger;
use super::record::AlertRecord;
use super::store::LedgerStoreError;

/// One sampled value held against its threshold. Percent metrics are open
/// strictly above the threshold; a reading equal to the threshold counts as
/// healthy and resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe {
    Percent { value: f32, threshold: f32 },
    ServiceDown { down: bool },
}

impl Probe {
    pub fn is_open(&self) -> bool {
        match *self {
            Probe::Percent { value, threshold } => value > threshold,
            Probe::ServiceDown { down } => down,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            Probe::Percent { value, .. } => value,
            Probe::ServiceDown { down } => {
                if down {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    New,
    Recurring,
    /// Open but inside the cooldown window: folded into the firing bucket,
    /// distinguished only for logging.
    Unchanged,
    Resolved,
}

impl TransitionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransitionKind::New => "new",
            TransitionKind::Recurring => "recurring",
            TransitionKind::Unchanged => "unchanged",
            TransitionKind::Resolved => "resolved",
        }
    }
}

/// Classified outcome of one evaluation, carrying the record snapshot as it
/// looked right after the ledger mutation. `note` is optional diagnostic
/// enrichment attached later by the pass.
#[derive(Debug, Clone)]
pub struct Transition {
    pub kind: TransitionKind,
    pub record: AlertRecord,
    pub resolved_value: Option<f32>,
    pub note: Option<String>,
}

/// Feed one reading through the ledger and classify the lifecycle change.
///
/// Open conditions always leave an audit line, independent of any cooldown.
/// A healthy reading for an identity that was never open returns `None`:
/// there is nothing to report and nothing to log.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    ledger: &mut AlertLedger,
    audit: &AuditLog,
    cooldown: Duration,
    server: &str,
    hostname: &str,
    kind: &str,
    probe: Probe,
    message: &str,
    now: DateTime<Utc>,
) -> Result<Option<Transition>, LedgerStoreError> {
    let id = alert_id(server, hostname, kind);

    if probe.is_open() {
        audit.append(server, hostname, message, now);

        let (record, is_new) = ledger.open_or_refresh(&id, server, hostname, kind, message, now)?;
        let transition_kind = if is_new {
            TransitionKind::New
        } else if should_notify(&record, now, cooldown) {
            TransitionKind::Recurring
        } else {
            TransitionKind::Unchanged
        };

        log::warn!(
            "alert_open server={} hostname={} type={} transition={} message={:?}",
            server,
            hostname,
            kind,
            transition_kind.label(),
            message
        );

        return Ok(Some(Transition {
            kind: transition_kind,
            record,
            resolved_value: None,
            note: None,
        }));
    }

    match ledger.resolve(&id, now)? {
        Some(record) => {
            log::info!(
                "alert_resolved server={} hostname={} type={} value={:.1}",
                server,
                hostname,
                kind,
                probe.value()
            );
            Ok(Some(Transition {
                kind: TransitionKind::Resolved,
                record,
                resolved_value: Some(probe.value()),
                note: None,
            }))
        }
        None => Ok(None),
    }
}
