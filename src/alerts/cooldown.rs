use chrono::{DateTime, Duration, Utc};

use super::ledger::AlertLedger;
use super::record::AlertRecord;
use super::store::LedgerStoreError;

/// Per-alert advisory check: a record is due when it was never notified or
/// its last notification is at least one cooldown period old. Actual sends
/// are decided at the end-of-pass flush, not here.
pub fn should_notify(record: &AlertRecord, now: DateTime<Utc>, cooldown: Duration) -> bool {
    match record.last_notified {
        None => true,
        Some(last) => now.signed_duration_since(last) >= cooldown,
    }
}

/// Re-arm the cooldown window for the entire open set after a batch send.
///
/// Deliberately covers alerts that were not part of the triggering batch:
/// one outbound message silences every known issue for a full cooldown
/// period, which is what keeps staggered recurring alerts from re-firing
/// independently shortly after any notification goes out.
pub fn reset_all_cooldowns(
    ledger: &mut AlertLedger,
    now: DateTime<Utc>,
) -> Result<(), LedgerStoreError> {
    ledger.mark_all_notified(now)
}
