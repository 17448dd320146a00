use async_trait::async_trait;
use thiserror::Error;

use super::batch::AlertBatch;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("smtp delivery failed: {0}")]
    Smtp(String),
    #[error("telegram delivery failed: {0}")]
    Telegram(String),
}

/// One outbound channel. Implementations render the shared batch shape into
/// their own payload and deliver it.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send_batch(&self, batch: &AlertBatch) -> Result<(), NotifyError>;
}

/// Fans one batch out to every enabled channel. A failing channel is logged
/// and skipped; it never blocks the remaining channels and the caller only
/// learns how many deliveries succeeded.
pub struct Dispatcher {
    channels: Vec<Box<dyn NotifyChannel>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn NotifyChannel>>) -> Self {
        Self { channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub async fn dispatch(&self, batch: &AlertBatch) -> usize {
        let mut delivered = 0;
        for channel in &self.channels {
            match channel.send_batch(batch).await {
                Ok(()) => {
                    delivered += 1;
                    log::info!(
                        "notification_sent channel={} alerts={} servers={}",
                        channel.name(),
                        batch.item_count(),
                        batch.server_names().join(",")
                    );
                }
                Err(error) => {
                    log::error!(
                        "notification_failed channel={} error={}",
                        channel.name(),
                        error
                    );
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use crate::notify::batch::{AlertBatch, BatchKind};

    use super::{Dispatcher, NotifyChannel, NotifyError};

    struct CountingChannel {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl NotifyChannel for CountingChannel {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn send_batch(&self, _batch: &AlertBatch) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NotifyError::Smtp("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn empty_batch() -> AlertBatch {
        AlertBatch::build(
            BatchKind::Firing,
            &BTreeMap::new(),
            &[],
            Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn failing_channel_does_not_block_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            Box::new(CountingChannel { calls: calls.clone(), fail: true }),
            Box::new(CountingChannel { calls: calls.clone(), fail: false }),
        ]);

        let delivered = dispatcher.dispatch(&empty_batch()).await;
        assert_eq!(delivered, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
