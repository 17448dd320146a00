use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::identity::AlertId;
use super::record::AlertRecord;
use super::store::{LedgerSnapshot, LedgerStore, LedgerStoreError};

/// Durable mapping of alert identity to lifecycle record.
///
/// An identity lives in at most one of the two sets; resolution moves the
/// record, it never copies it. Every mutating call persists the full
/// snapshot through the injected store before returning.
pub struct AlertLedger {
    open: BTreeMap<AlertId, AlertRecord>,
    resolved: BTreeMap<AlertId, AlertRecord>,
    store: Box<dyn LedgerStore>,
}

impl AlertLedger {
    /// A missing backing store starts empty; an unreadable one is logged and
    /// also starts empty. Previously-open alerts will simply reappear as new
    /// on the next pass.
    pub fn load(store: Box<dyn LedgerStore>) -> Self {
        let snapshot = match store.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                log::info!("ledger_initialized_empty reason=no_backing_store");
                LedgerSnapshot::default()
            }
            Err(error) => {
                log::error!("ledger_reset reason=unreadable_backing_store error={}", error);
                LedgerSnapshot::default()
            }
        };

        Self {
            open: snapshot.active_alerts,
            resolved: snapshot.resolved_alerts,
            store,
        }
    }

    pub fn is_open(&self, id: &AlertId) -> bool {
        self.open.contains_key(id)
    }

    pub fn get_open(&self, id: &AlertId) -> Option<&AlertRecord> {
        self.open.get(id)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Insert a fresh record (first = last = now) or advance `last_detected`
    /// on an existing one. Reopening a previously-resolved identity drops the
    /// stale resolution entry. Returns a snapshot of the record and whether
    /// it was newly inserted.
    pub fn open_or_refresh(
        &mut self,
        id: &AlertId,
        server: &str,
        hostname: &str,
        kind: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<(AlertRecord, bool), LedgerStoreError> {
        let (record, is_new) = match self.open.entry(id.clone()) {
            Entry::Vacant(entry) => {
                self.resolved.remove(id);
                let record = entry.insert(AlertRecord {
                    server: server.to_string(),
                    hostname: hostname.to_string(),
                    kind: kind.to_string(),
                    message: message.to_string(),
                    first_detected: now,
                    last_detected: now,
                    last_notified: None,
                    resolved_at: None,
                });
                (record.clone(), true)
            }
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                record.last_detected = now;
                (record.clone(), false)
            }
        };

        self.persist()?;
        Ok((record, is_new))
    }

    /// Move an open record to the resolved set, stamping `resolved_at`.
    /// Returns `None` (and persists nothing) when the identity is not open.
    pub fn resolve(
        &mut self,
        id: &AlertId,
        now: DateTime<Utc>,
    ) -> Result<Option<AlertRecord>, LedgerStoreError> {
        let Some(mut record) = self.open.remove(id) else {
            return Ok(None);
        };

        record.resolved_at = Some(now);
        self.resolved.insert(id.clone(), record.clone());
        self.persist()?;
        Ok(Some(record))
    }

    /// Open records ordered by server, then by how long they have been open.
    pub fn list_open(&self) -> Vec<&AlertRecord> {
        let mut records: Vec<&AlertRecord> = self.open.values().collect();
        records.sort_by(|a, b| {
            a.server
                .cmp(&b.server)
                .then(a.first_detected.cmp(&b.first_detected))
        });
        records
    }

    /// Stamp `last_notified = now` on every open record. The cooldown reset
    /// after a batch send goes through here so one persist covers the whole
    /// open set.
    pub fn mark_all_notified(&mut self, now: DateTime<Utc>) -> Result<(), LedgerStoreError> {
        for record in self.open.values_mut() {
            record.last_notified = Some(now);
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), LedgerStoreError> {
        self.store.save(&LedgerSnapshot {
            active_alerts: self.open.clone(),
            resolved_alerts: self.resolved.clone(),
        })
    }
}
