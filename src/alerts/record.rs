use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked condition, open or resolved.
///
/// `last_detected` advances on every pass that still sees the condition;
/// `last_notified` advances only when a notification batch goes out;
/// `resolved_at` is stamped when the record moves to the resolved set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub server: String,
    pub hostname: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(with = "ledger_time")]
    pub first_detected: DateTime<Utc>,
    #[serde(with = "ledger_time")]
    pub last_detected: DateTime<Utc>,
    #[serde(with = "ledger_time::option")]
    pub last_notified: Option<DateTime<Utc>>,
    #[serde(
        with = "ledger_time::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// `YYYY-MM-DD HH:MM:SS` timestamps in the persisted ledger.
pub(crate) mod ledger_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, NaiveDateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        use super::FORMAT;

        pub fn serialize<S>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(raw) => NaiveDateTime::parse_from_str(&raw, FORMAT)
                    .map(|naive| Some(naive.and_utc()))
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}
