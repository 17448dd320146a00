use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Stable key for one logical ongoing issue on one server.
///
/// Derived from `nickname:hostname:kind`, so the same condition maps to the
/// same identity across passes and process restarts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AlertId(String);

impl AlertId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn alert_id(server: &str, hostname: &str, kind: &str) -> AlertId {
    let key = format!("{}:{}:{}", server, hostname, kind);
    AlertId(format!("{:016x}", xxh3_64(key.as_bytes())))
}
