use crate::alerts::TransitionKind;

use super::batch::{AlertBatch, BatchItem, BatchKind};

impl AlertBatch {
    /// HTML body for the mail channel: one table per server plus the open
    /// alerts context table.
    pub fn render_html(&self) -> String {
        let (accent, heading, lede) = match self.kind {
            BatchKind::Firing => (
                "#ff3860",
                "⚠️ Server Alerts",
                "The following issues require your attention.",
            ),
            BatchKind::Resolved => (
                "#48c774",
                "✅ Alerts Resolved",
                "The following issues have returned to normal.",
            ),
        };

        let mut html = String::new();
        html.push_str("<html><body style=\"font-family: Arial, sans-serif; color: #333;\">\n");
        html.push_str(&format!(
            "<h1 style=\"color: {};\">{}</h1>\n<p>{}</p>\n",
            accent, heading, lede
        ));

        for group in &self.groups {
            html.push_str(&format!(
                "<h2>{} <span style=\"color: #777; font-family: monospace; font-size: 14px;\">({})</span></h2>\n",
                html_escape::encode_text(&group.server),
                html_escape::encode_text(&group.hostname)
            ));
            html.push_str("<table border=\"1\" cellpadding=\"6\" cellspacing=\"0\" style=\"border-collapse: collapse;\">\n");
            html.push_str("<tr><th>Type</th><th>Status</th><th>Detail</th></tr>\n");
            for item in &group.items {
                html.push_str(&format!(
                    "<tr><td>{}</td><td style=\"color: {};\">{}</td><td>{}</td></tr>\n",
                    html_escape::encode_text(&item.kind),
                    accent,
                    status_label(item),
                    html_escape::encode_text(&item_detail(item))
                ));
            }
            html.push_str("</table>\n");

            for item in &group.items {
                if let Some(note) = &item.note {
                    html.push_str(&format!(
                        "<pre style=\"background-color: #f5f5f5; padding: 10px;\">{}</pre>\n",
                        html_escape::encode_text(note)
                    ));
                }
            }
        }

        if !self.open_context.is_empty() {
            html.push_str("<h2>Open alerts</h2>\n");
            html.push_str("<table border=\"1\" cellpadding=\"6\" cellspacing=\"0\" style=\"border-collapse: collapse;\">\n");
            html.push_str("<tr><th>Server</th><th>Type</th><th>Issue</th><th>Open for</th></tr>\n");
            for line in &self.open_context {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    html_escape::encode_text(&line.server),
                    html_escape::encode_text(&line.kind),
                    html_escape::encode_text(&line.message),
                    html_escape::encode_text(&line.age)
                ));
            }
            html.push_str("</table>\n");
        }

        html.push_str(&format!(
            "<p style=\"color: #777; font-size: 12px;\">Generated: {} UTC · This is an automated message from Fleetwatch.</p>\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        html.push_str("</body></html>\n");
        html
    }

    /// Telegram HTML-mode text for the chat channel: a flat per-server list.
    pub fn render_text(&self) -> String {
        let heading = match self.kind {
            BatchKind::Firing => "🚨 <b>SERVER ALERTS</b>",
            BatchKind::Resolved => "✅ <b>ALERTS RESOLVED</b>",
        };

        let mut text = String::new();
        text.push_str(heading);
        text.push('\n');

        for group in &self.groups {
            text.push_str(&format!(
                "\n<b>{}</b> <code>{}</code>\n",
                html_escape::encode_text(&group.server),
                html_escape::encode_text(&group.hostname)
            ));
            for item in &group.items {
                text.push_str(&format!(
                    "• [{}] {} — {}\n",
                    html_escape::encode_text(&item.kind),
                    html_escape::encode_text(&item_detail(item)),
                    status_label(item)
                ));
                if let Some(note) = &item.note {
                    text.push_str(&format!(
                        "<pre>{}</pre>\n",
                        html_escape::encode_text(note)
                    ));
                }
            }
        }

        if !self.open_context.is_empty() {
            text.push_str("\n<b>Open alerts:</b>\n");
            for line in &self.open_context {
                text.push_str(&format!(
                    "• {} [{}] {} (open for {})\n",
                    html_escape::encode_text(&line.server),
                    html_escape::encode_text(&line.kind),
                    html_escape::encode_text(&line.message),
                    line.age
                ));
            }
        }

        text.push_str(&format!(
            "\n<i>{} UTC · automated message from Fleetwatch</i>",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        text
    }
}

fn status_label(item: &BatchItem) -> &'static str {
    match item.transition {
        TransitionKind::New => "NEW",
        TransitionKind::Recurring | TransitionKind::Unchanged => "RECURRING",
        TransitionKind::Resolved => "RESOLVED",
    }
}

fn item_detail(item: &BatchItem) -> String {
    match item.transition {
        TransitionKind::Resolved => {
            let duration = item
                .resolved_at
                .map(|resolved| super::batch::format_age(item.first_detected, resolved))
                .unwrap_or_else(|| "unknown".to_string());
            if item.kind.starts_with("service:") {
                return format!("back up after {} (was: {})", duration, item.message);
            }
            match item.resolved_value {
                Some(value) => format!(
                    "recovered at {:.1}% after {} (was: {})",
                    value, duration, item.message
                ),
                None => format!("recovered after {} (was: {})", duration, item.message),
            }
        }
        _ => item.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, TimeZone, Utc};

    use crate::alerts::{Transition, TransitionKind};
    use crate::alerts::AlertRecord;
    use crate::notify::batch::{AlertBatch, BatchKind};

    fn resolved_transition() -> Transition {
        let opened = Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap();
        Transition {
            kind: TransitionKind::Resolved,
            record: AlertRecord {
                server: "web1".to_string(),
                hostname: "203.0.113.10".to_string(),
                kind: "cpu".to_string(),
                message: "CPU usage at 92.3%, threshold is 80%".to_string(),
                first_detected: opened,
                last_detected: opened + Duration::hours(3),
                last_notified: Some(opened),
                resolved_at: Some(opened + Duration::hours(3)),
            },
            resolved_value: Some(41.5),
            note: None,
        }
    }

    #[test]
    fn html_contains_table_rows_and_context() {
        let mut buckets: BTreeMap<String, Vec<Transition>> = BTreeMap::new();
        let mut t = resolved_transition();
        t.kind = TransitionKind::New;
        t.resolved_value = None;
        t.record.resolved_at = None;
        buckets.insert("web1".to_string(), vec![t]);

        let open = AlertRecord {
            server: "db1".to_string(),
            hostname: "10.0.0.7".to_string(),
            kind: "memory".to_string(),
            message: "Memory usage at 91.0%, threshold is 80%".to_string(),
            first_detected: Utc.with_ymd_and_hms(2025, 4, 4, 8, 0, 0).unwrap(),
            last_detected: Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap(),
            last_notified: None,
            resolved_at: None,
        };

        let batch = AlertBatch::build(
            BatchKind::Firing,
            &buckets,
            &[&open],
            Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap(),
        );
        let html = batch.render_html();

        assert!(html.contains("<td>cpu</td>"));
        assert!(html.contains("NEW"));
        assert!(html.contains("Open alerts"));
        assert!(html.contains("2 hours, 0 minutes"));
    }

    #[test]
    fn resolved_text_reports_recovery_and_duration() {
        let mut buckets: BTreeMap<String, Vec<Transition>> = BTreeMap::new();
        buckets.insert("web1".to_string(), vec![resolved_transition()]);

        let batch = AlertBatch::build(
            BatchKind::Resolved,
            &buckets,
            &[],
            Utc.with_ymd_and_hms(2025, 4, 4, 13, 0, 0).unwrap(),
        );
        let text = batch.render_text();

        assert!(text.contains("ALERTS RESOLVED"));
        assert!(text.contains("recovered at 41.5%"));
        assert!(text.contains("3 hours, 0 minutes"));
    }

    #[test]
    fn chat_text_escapes_html_in_messages() {
        let mut buckets: BTreeMap<String, Vec<Transition>> = BTreeMap::new();
        let mut t = resolved_transition();
        t.kind = TransitionKind::New;
        t.record.message = "Disk usage for /mnt/<data> at 96.0%".to_string();
        buckets.insert("web1".to_string(), vec![t]);

        let batch = AlertBatch::build(
            BatchKind::Firing,
            &buckets,
            &[],
            Utc.with_ymd_and_hms(2025, 4, 4, 13, 0, 0).unwrap(),
        );
        assert!(batch.render_text().contains("&lt;data&gt;"));
    }
}
