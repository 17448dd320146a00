use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::alerts::{Transition, TransitionKind};
use crate::alerts::AlertRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Firing,
    Resolved,
}

/// One alert inside a batch, flattened from the transition snapshot.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub transition: TransitionKind,
    pub kind: String,
    pub message: String,
    pub first_detected: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_value: Option<f32>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerGroup {
    pub server: String,
    pub hostname: String,
    pub items: Vec<BatchItem>,
}

/// "Open alerts" context line attached to every outbound message.
#[derive(Debug, Clone)]
pub struct OpenAlertLine {
    pub server: String,
    pub kind: String,
    pub message: String,
    pub age: String,
}

/// Channel-independent shape of one outbound notification: the pass's
/// transitions of one kind grouped by server, plus the current open-alert
/// context. Each channel renders this its own way.
#[derive(Debug, Clone)]
pub struct AlertBatch {
    pub kind: BatchKind,
    pub groups: Vec<ServerGroup>,
    pub open_context: Vec<OpenAlertLine>,
    pub generated_at: DateTime<Utc>,
}

impl AlertBatch {
    pub fn build(
        kind: BatchKind,
        buckets: &BTreeMap<String, Vec<Transition>>,
        open: &[&AlertRecord],
        now: DateTime<Utc>,
    ) -> Self {
        let groups = buckets
            .iter()
            .filter(|(_, transitions)| !transitions.is_empty())
            .map(|(server, transitions)| ServerGroup {
                server: server.clone(),
                hostname: transitions[0].record.hostname.clone(),
                items: transitions
                    .iter()
                    .map(|transition| BatchItem {
                        transition: transition.kind,
                        kind: transition.record.kind.clone(),
                        message: transition.record.message.clone(),
                        first_detected: transition.record.first_detected,
                        resolved_at: transition.record.resolved_at,
                        resolved_value: transition.resolved_value,
                        note: transition.note.clone(),
                    })
                    .collect(),
            })
            .collect();

        let open_context = open
            .iter()
            .map(|record| OpenAlertLine {
                server: record.server.clone(),
                kind: record.kind.clone(),
                message: record.message.clone(),
                age: format_age(record.first_detected, now),
            })
            .collect();

        Self {
            kind,
            groups,
            open_context,
            generated_at: now,
        }
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    pub fn server_names(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.server.as_str()).collect()
    }

    pub fn subject(&self) -> String {
        let servers = self.server_names().join(", ");
        match self.kind {
            BatchKind::Firing => format!(
                "FLEETWATCH ALERT: {} issue(s) on {}",
                self.item_count(),
                servers
            ),
            BatchKind::Resolved => format!(
                "FLEETWATCH RESOLVED: {} issue(s) on {}",
                self.item_count(),
                servers
            ),
        }
    }
}

/// Age rendered as days/hours/minutes, days omitted when zero.
pub fn format_age(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let elapsed = to.signed_duration_since(from).max(Duration::zero());
    let days = elapsed.num_days();
    let hours = elapsed.num_hours() % 24;
    let minutes = elapsed.num_minutes() % 60;
    if days > 0 {
        format!("{} days, {} hours, {} minutes", days, hours, minutes)
    } else {
        format!("{} hours, {} minutes", hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, TimeZone, Utc};

    use crate::alerts::{Transition, TransitionKind};
    use crate::alerts::AlertRecord;

    use super::{format_age, AlertBatch, BatchKind};

    fn transition(server: &str, kind: &str, transition: TransitionKind) -> Transition {
        let now = Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap();
        Transition {
            kind: transition,
            record: AlertRecord {
                server: server.to_string(),
                hostname: format!("{}.example.net", server),
                kind: kind.to_string(),
                message: format!("{} over threshold", kind),
                first_detected: now,
                last_detected: now,
                last_notified: None,
                resolved_at: None,
            },
            resolved_value: None,
            note: None,
        }
    }

    #[test]
    fn build_groups_by_server() {
        let mut buckets: BTreeMap<String, Vec<Transition>> = BTreeMap::new();
        buckets.insert(
            "web1".to_string(),
            vec![
                transition("web1", "cpu", TransitionKind::New),
                transition("web1", "memory", TransitionKind::Recurring),
            ],
        );
        buckets.insert(
            "db1".to_string(),
            vec![transition("db1", "disk:/var", TransitionKind::New)],
        );

        let now = Utc.with_ymd_and_hms(2025, 4, 4, 10, 5, 0).unwrap();
        let batch = AlertBatch::build(BatchKind::Firing, &buckets, &[], now);

        assert_eq!(batch.item_count(), 3);
        assert_eq!(batch.server_names(), vec!["db1", "web1"]);
        assert_eq!(batch.subject(), "FLEETWATCH ALERT: 3 issue(s) on db1, web1");
    }

    #[test]
    fn age_formatting_matches_day_hour_minute_shape() {
        let from = Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap();

        assert_eq!(
            format_age(from, from + Duration::minutes(42)),
            "0 hours, 42 minutes"
        );
        assert_eq!(
            format_age(from, from + Duration::hours(3) + Duration::minutes(5)),
            "3 hours, 5 minutes"
        );
        assert_eq!(
            format_age(
                from,
                from + Duration::days(2) + Duration::hours(1) + Duration::minutes(7)
            ),
            "2 days, 1 hours, 7 minutes"
        );
    }

    #[test]
    fn open_context_carries_ages() {
        let opened = Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap();
        let record = AlertRecord {
            server: "web1".to_string(),
            hostname: "h".to_string(),
            kind: "memory".to_string(),
            message: "Memory usage at 91.0%, threshold is 80%".to_string(),
            first_detected: opened,
            last_detected: opened,
            last_notified: None,
            resolved_at: None,
        };

        let batch = AlertBatch::build(
            BatchKind::Firing,
            &BTreeMap::new(),
            &[&record],
            opened + Duration::hours(5),
        );
        assert_eq!(batch.open_context.len(), 1);
        assert_eq!(batch.open_context[0].age, "5 hours, 0 minutes");
    }
}
