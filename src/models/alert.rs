use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp used as the sort key for alerts that carry none; sorts after
/// every real ISO-8601 timestamp in descending order.
pub const EPOCH_FLOOR: &str = "1970-01-01T00:00:00Z";

/// The closed set of recognised alert levels. `Alert.level` itself stays a
/// free string so documents containing unknown levels still load; this enum
/// is used for validation on append and for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 3] = [AlertLevel::Info, AlertLevel::Warning, AlertLevel::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<AlertLevel> {
        match s {
            "info" => Some(AlertLevel::Info),
            "warning" => Some(AlertLevel::Warning),
            "critical" => Some(AlertLevel::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded threshold-breach event. Immutable once written; the store only
/// appends new alerts or replaces the whole collection. Duplicates are legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub timestamp: String,
}

impl Alert {
    pub fn known_level(&self) -> Option<AlertLevel> {
        AlertLevel::parse(&self.level)
    }

    /// Sort key for recency ordering; alerts without a timestamp sort as the
    /// epoch floor, i.e. last.
    pub fn sort_key(&self) -> &str {
        if self.timestamp.is_empty() {
            EPOCH_FLOOR
        } else {
            &self.timestamp
        }
    }
}

/// On-disk alert log: a file-level last-write marker plus the alert sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFile {
    pub timestamp: String,
    pub alerts: Vec<Alert>,
}

impl AlertFile {
    pub fn empty(timestamp: String) -> Self {
        Self {
            timestamp,
            alerts: Vec::new(),
        }
    }
}
