use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::notify::{AlertBatch, BatchKind};
use crate::notify::Dispatcher;

use super::cooldown::{reset_all_cooldowns, should_notify};
use super::evaluator::{Transition, TransitionKind};
use super::ledger::AlertLedger;

/// Violating the session contract is a caller bug, not a runtime condition:
/// these are never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a notification session is already open")]
    AlreadyOpen,
    #[error("no notification session is open")]
    NotOpen,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FlushOutcome {
    pub firing_sent: bool,
    pub firing_suppressed: bool,
    pub resolved_sent: bool,
    pub channels_delivered: usize,
    pub cooldowns_reset: bool,
}

/// Batching scope of one monitoring pass.
///
/// Two states: idle and open. Transitions recorded while open accumulate in
/// two per-server buckets (new/recurring and resolved) and are flushed as at
/// most two outbound batches when the pass ends. Nothing survives the flush;
/// a session is never carried across passes.
#[derive(Default)]
pub struct NotificationSession {
    open: bool,
    firing: BTreeMap<String, Vec<Transition>>,
    resolved: BTreeMap<String, Vec<Transition>>,
}

impl NotificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.open {
            return Err(SessionError::AlreadyOpen);
        }
        self.open = true;
        Ok(())
    }

    /// Route a transition into its bucket, keyed by server. Within a server,
    /// insertion order is evaluation order, so each bucket stays
    /// server-then-chronological.
    pub fn record(&mut self, transition: Transition) -> Result<(), SessionError> {
        if !self.open {
            return Err(SessionError::NotOpen);
        }

        let bucket = match transition.kind {
            TransitionKind::Resolved => &mut self.resolved,
            _ => &mut self.firing,
        };
        bucket
            .entry(transition.record.server.clone())
            .or_default()
            .push(transition);
        Ok(())
    }

    /// End-of-pass flush.
    ///
    /// The firing batch goes out only when at least one member is past its
    /// cooldown; members that individually are not due still ride along for
    /// context. The resolved batch always goes out: resolution is a one-shot
    /// event because the record has already left the open set. After any
    /// send attempt the cooldown reset runs exactly once, whatever the
    /// channel outcomes were.
    pub async fn end(
        &mut self,
        ledger: &mut AlertLedger,
        dispatcher: &Dispatcher,
        cooldown: Duration,
        now: DateTime<Utc>,
    ) -> Result<FlushOutcome, SessionError> {
        if !self.open {
            return Err(SessionError::NotOpen);
        }

        let mut outcome = FlushOutcome::default();
        let mut send_attempted = false;

        if !self.firing.is_empty() {
            let any_due = self
                .firing
                .values()
                .flatten()
                .any(|transition| should_notify(&transition.record, now, cooldown));

            if any_due {
                let batch =
                    AlertBatch::build(BatchKind::Firing, &self.firing, &ledger.list_open(), now);
                outcome.channels_delivered += dispatcher.dispatch(&batch).await;
                outcome.firing_sent = true;
                send_attempted = true;
            } else {
                outcome.firing_suppressed = true;
                log::info!(
                    "notification_batch_suppressed kind=firing reason=cooldown alerts={}",
                    self.firing.values().map(Vec::len).sum::<usize>()
                );
            }
        }

        if !self.resolved.is_empty() {
            // The resolved records already left the open set at evaluation
            // time, so list_open() is the correct context here as well.
            let batch =
                AlertBatch::build(BatchKind::Resolved, &self.resolved, &ledger.list_open(), now);
            outcome.channels_delivered += dispatcher.dispatch(&batch).await;
            outcome.resolved_sent = true;
            send_attempted = true;
        }

        if send_attempted {
            if let Err(error) = reset_all_cooldowns(ledger, now) {
                log::error!("cooldown_reset_persist_failed error={}", error);
            }
            outcome.cooldowns_reset = true;
        }

        self.firing.clear();
        self.resolved.clear();
        self.open = false;
        Ok(outcome)
    }
}
