use crate::config::{Config, ServerSpec};
use crate::subscribers::SubscriberStore;

/// Shared state handed to the command handler and the background jobs. The
/// subscriber store is the only piece the bot loop and the monitor both
/// touch; the ledger and session stay private to the monitor runtime.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub fleet: Vec<ServerSpec>,
    pub subscribers: SubscriberStore,
}

impl AppContext {
    pub fn new(config: Config, fleet: Vec<ServerSpec>) -> Self {
        let subscribers = SubscriberStore::load(&config.telegram.subscribers_path);
        Self {
            config,
            fleet,
            subscribers,
        }
    }
}
