use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::alerts::ledger_time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    #[serde(with = "ledger_time")]
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SubscriberFile {
    #[serde(default)]
    subscribers: Vec<Subscriber>,
}

/// Persisted Telegram subscriber list, shared between the bot command loop
/// and the Telegram notification channel. Mutations persist before
/// returning; a failed write keeps the in-memory state and logs.
#[derive(Clone)]
pub struct SubscriberStore {
    path: Arc<PathBuf>,
    entries: Arc<Mutex<Vec<Subscriber>>>,
}

impl SubscriberStore {
    /// Missing file starts empty; a malformed one is logged and starts empty.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<SubscriberFile>(&raw) {
                Ok(file) => {
                    log::info!(
                        "subscribers_loaded count={} path={}",
                        file.subscribers.len(),
                        path.display()
                    );
                    file.subscribers
                }
                Err(error) => {
                    log::error!(
                        "subscribers_reset reason=invalid_json path={} error={}",
                        path.display(),
                        error
                    );
                    Vec::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(error) => {
                log::error!(
                    "subscribers_reset reason=unreadable path={} error={}",
                    path.display(),
                    error
                );
                Vec::new()
            }
        };

        Self {
            path: Arc::new(path),
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Returns false when the chat is already subscribed.
    pub async fn add(
        &self,
        chat_id: i64,
        username: Option<String>,
        first_name: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|entry| entry.chat_id == chat_id) {
            return false;
        }

        entries.push(Subscriber {
            chat_id,
            username,
            first_name,
            subscribed_at: now,
        });
        self.persist(&entries);
        log::info!("subscriber_added chat_id={} total={}", chat_id, entries.len());
        true
    }

    /// Returns false when the chat was not subscribed.
    pub async fn remove(&self, chat_id: i64) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|entry| entry.chat_id != chat_id);
        if entries.len() == before {
            return false;
        }

        self.persist(&entries);
        log::info!("subscriber_removed chat_id={} total={}", chat_id, entries.len());
        true
    }

    pub async fn get(&self, chat_id: i64) -> Option<Subscriber> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|entry| entry.chat_id == chat_id)
            .cloned()
    }

    pub async fn list(&self) -> Vec<Subscriber> {
        self.entries.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }

    fn persist(&self, entries: &[Subscriber]) {
        if let Err(error) = write_atomically(&self.path, entries) {
            log::error!(
                "subscribers_persist_failed path={} error={}",
                self.path.display(),
                error
            );
        }
    }
}

fn write_atomically(path: &Path, entries: &[Subscriber]) -> Result<(), std::io::Error> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    let file = SubscriberFile {
        subscribers: entries.to_vec(),
    };
    serde_json::to_writer_pretty(&mut temp, &file).map_err(std::io::Error::other)?;
    temp.write_all(b"\n")?;
    temp.persist(path).map_err(|error| error.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::SubscriberStore;

    #[tokio::test]
    async fn add_remove_round_trips_through_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("subscribers.json");
        let now = Utc.with_ymd_and_hms(2025, 4, 4, 10, 0, 0).unwrap();

        let store = SubscriberStore::load(&path);
        assert!(store.add(42, Some("alice".to_string()), None, now).await);
        assert!(!store.add(42, Some("alice".to_string()), None, now).await);
        assert!(store.add(43, None, Some("Bob".to_string()), now).await);

        let reloaded = SubscriberStore::load(&path);
        assert_eq!(reloaded.count().await, 2);
        assert_eq!(
            reloaded.get(42).await.expect("alice present").username,
            Some("alice".to_string())
        );

        assert!(reloaded.remove(42).await);
        assert!(!reloaded.remove(42).await);
        assert_eq!(SubscriberStore::load(&path).count().await, 1);
    }

    #[tokio::test]
    async fn malformed_file_starts_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("subscribers.json");
        std::fs::write(&path, "[oops").expect("write garbage");

        let store = SubscriberStore::load(&path);
        assert_eq!(store.count().await, 0);
    }
}
