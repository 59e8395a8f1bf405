//! Alert store: a JSON alert log with append, filter, sort and clear
//! operations. The on-disk file is the single source of truth; every
//! operation reads it fresh and writes are whole-document rewrites, never
//! partial appends.

use crate::error::AlertStoreError;
use crate::models::alert::{Alert, AlertFile, AlertLevel};
use chrono::Utc;
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use std::fs;
use std::path::Path;

fn utc_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Load alerts from the log at `path`, sorted by recency (newest first).
///
/// Load-or-initialize semantics: if the file is absent, the canonical empty
/// structure is created at `path` (parent directories included) as a
/// deliberate, documented side effect of the read, and an empty sequence is
/// returned. A corrupt file or a non-array `alerts` field is logged and
/// yields an empty sequence; the file is left untouched — only explicit
/// clear/create operations rewrite it.
///
/// A valid `level_filter` (info/warning/critical) restricts the result before
/// sorting and limiting; an unrecognised filter value is ignored. A nonzero
/// `limit` truncates after sorting.
pub fn load_alerts<P: AsRef<Path>>(
    path: P,
    level_filter: Option<&str>,
    limit: Option<usize>,
) -> Vec<Alert> {
    let path = path.as_ref();

    if !path.exists() {
        info!("alert file not found, creating empty log: {}", path.display());
        if let Err(e) = create_empty_alert_file(path) {
            error!("failed to create alert file {}: {}", path.display(), e);
        }
        return Vec::new();
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("failed to read alert file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let file: AlertFile = match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(e) => {
            warn!("invalid alert file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut alerts = file.alerts;

    if let Some(filter) = level_filter {
        if AlertLevel::parse(filter).is_some() {
            alerts.retain(|alert| alert.level == filter);
        }
    }

    // Stable, descending by timestamp; ISO-8601 strings sort correctly
    // lexicographically and missing timestamps sort as the epoch floor.
    alerts.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));

    if let Some(limit) = limit {
        if limit > 0 {
            alerts.truncate(limit);
        }
    }

    debug!("loaded {} alerts from {}", alerts.len(), path.display());
    alerts
}

/// Write the canonical empty alert structure at `path`, creating parent
/// directories as needed.
pub fn create_empty_alert_file<P: AsRef<Path>>(path: P) -> Result<(), AlertStoreError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| AlertStoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let empty = AlertFile::empty(utc_now());
    write_alert_file(path, &empty)?;

    info!("created empty alert file: {}", path.display());
    Ok(())
}

/// Append one alert to the log at `path`.
///
/// Rejects unrecognised levels before any I/O. The existing document is
/// loaded (or started from the empty structure if absent), the new alert is
/// appended with a fresh UTC timestamp, the file-level timestamp is updated
/// and the whole structure is written back. `value` and `threshold` are
/// included in the written alert only when supplied.
pub fn append_alert<P: AsRef<Path>>(
    path: P,
    metric: &str,
    level: &str,
    message: &str,
    value: Option<f64>,
    threshold: Option<f64>,
) -> Result<(), AlertStoreError> {
    let Some(known) = AlertLevel::parse(level) else {
        error!("rejected alert with invalid level '{level}'");
        return Err(AlertStoreError::InvalidLevel(level.to_string()));
    };

    let path = path.as_ref();
    let mut file = if path.exists() {
        let raw = fs::read_to_string(path).map_err(|source| AlertStoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| AlertStoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        AlertFile::empty(String::new())
    };

    let now = utc_now();
    file.alerts.push(Alert {
        level: known.as_str().to_string(),
        metric: metric.to_string(),
        message: message.to_string(),
        value,
        threshold,
        timestamp: now.clone(),
    });
    file.timestamp = now;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| AlertStoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    write_alert_file(path, &file)?;

    info!("added {known} alert for {metric}: {message}");
    Ok(())
}

/// Clear all alerts, equivalent to writing the canonical empty structure.
/// Idempotent.
pub fn clear_alerts<P: AsRef<Path>>(path: P) -> Result<(), AlertStoreError> {
    create_empty_alert_file(path)
}

/// Count alerts per known level. The mapping covers exactly the three known
/// levels in fixed order; alerts with an unknown or missing level are counted
/// nowhere.
pub fn counts_by_level(alerts: &[Alert]) -> IndexMap<AlertLevel, usize> {
    let mut counts: IndexMap<AlertLevel, usize> =
        AlertLevel::ALL.iter().map(|&level| (level, 0)).collect();

    for alert in alerts {
        if let Some(level) = alert.known_level() {
            counts[&level] += 1;
        }
    }

    counts
}

/// Restrict a sequence of alerts to one metric tag.
pub fn filter_by_metric(alerts: &[Alert], metric: &str) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|alert| alert.metric == metric)
        .cloned()
        .collect()
}

/// The most recent alert, if any; ties resolve to the earliest entry in the
/// input sequence.
pub fn latest_alert(alerts: &[Alert]) -> Option<Alert> {
    let mut sorted = alerts.to_vec();
    sorted.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));
    sorted.into_iter().next()
}

fn write_alert_file(path: &Path, file: &AlertFile) -> Result<(), AlertStoreError> {
    let encoded = serde_json::to_vec_pretty(file)?;
    fs::write(path, encoded).map_err(|source| AlertStoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn alert(level: &str, metric: &str, timestamp: &str) -> Alert {
        Alert {
            level: level.to_string(),
            metric: metric.to_string(),
            message: format!("{metric} alert"),
            value: None,
            threshold: None,
            timestamp: timestamp.to_string(),
        }
    }

    fn write_log(path: &Path, alerts: Vec<Alert>) {
        let file = AlertFile {
            timestamp: "2025-12-05T10:00:00Z".to_string(),
            alerts,
        };
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_vec_pretty(&file).unwrap()).unwrap();
    }

    #[test]
    fn load_creates_empty_file_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("alerts.json");

        let alerts = load_alerts(&path, None, None);

        assert!(alerts.is_empty());
        // The read's documented side effect: the canonical empty structure
        // now exists on disk.
        let file: AlertFile = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(file.alerts.is_empty());
        assert!(!file.timestamp.is_empty());
    }

    #[test]
    fn corrupt_file_yields_empty_and_stays_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        fs::write(&path, "{not json").unwrap();

        let alerts = load_alerts(&path, None, None);

        assert!(alerts.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn non_array_alerts_field_yields_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        fs::write(&path, r#"{"timestamp": "x", "alerts": {"oops": true}}"#).unwrap();

        assert!(load_alerts(&path, None, None).is_empty());
    }

    #[test]
    fn alerts_sorted_newest_first_with_missing_timestamps_last() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        write_log(
            &path,
            vec![
                alert("info", "cpu", "2025-12-05T09:00:00Z"),
                alert("warning", "memory", ""),
                alert("critical", "disk", "2025-12-05T11:00:00Z"),
            ],
        );

        let alerts = load_alerts(&path, None, None);

        let metrics: Vec<&str> = alerts.iter().map(|a| a.metric.as_str()).collect();
        assert_eq!(metrics, ["disk", "cpu", "memory"]);
    }

    #[test]
    fn level_filter_applies_before_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        write_log(
            &path,
            vec![
                alert("critical", "disk", "2025-12-05T11:00:00Z"),
                alert("info", "cpu", "2025-12-05T10:00:00Z"),
                alert("info", "memory", "2025-12-05T09:00:00Z"),
            ],
        );

        let alerts = load_alerts(&path, Some("info"), Some(1));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, "cpu");
    }

    #[test]
    fn unrecognised_filter_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        write_log(
            &path,
            vec![
                alert("info", "cpu", "2025-12-05T10:00:00Z"),
                alert("warning", "memory", "2025-12-05T09:00:00Z"),
            ],
        );

        assert_eq!(load_alerts(&path, Some("everything"), None).len(), 2);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        write_log(
            &path,
            vec![
                alert("info", "cpu", "2025-12-05T10:00:00Z"),
                alert("info", "memory", "2025-12-05T09:00:00Z"),
            ],
        );

        assert_eq!(load_alerts(&path, None, Some(0)).len(), 2);
    }

    #[test]
    fn append_writes_alert_with_fresh_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");

        append_alert(&path, "cpu", "warning", "CPU usage above 80%", Some(85.5), Some(80.0))
            .unwrap();

        let alerts = load_alerts(&path, None, None);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, "warning");
        assert_eq!(alerts[0].value, Some(85.5));
        assert_eq!(alerts[0].threshold, Some(80.0));
        assert!(!alerts[0].timestamp.is_empty());
    }

    #[test]
    fn append_rejects_invalid_level_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        write_log(&path, vec![alert("info", "cpu", "2025-12-05T10:00:00Z")]);

        let result = append_alert(&path, "cpu", "urgent", "boom", None, None);

        assert!(matches!(result, Err(AlertStoreError::InvalidLevel(_))));
        assert_eq!(load_alerts(&path, None, None).len(), 1);
    }

    #[test]
    fn append_omits_value_and_threshold_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");

        append_alert(&path, "memory", "info", "note", None, None).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("\"value\""));
        assert!(!raw.contains("\"threshold\""));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        write_log(&path, vec![alert("critical", "disk", "2025-12-05T11:00:00Z")]);

        clear_alerts(&path).unwrap();
        clear_alerts(&path).unwrap();

        assert!(load_alerts(&path, None, None).is_empty());
    }

    #[test]
    fn counts_cover_exactly_three_levels_and_ignore_unknown() {
        let alerts = vec![
            alert("info", "cpu", "t1"),
            alert("warning", "memory", "t2"),
            alert("warning", "disk", "t3"),
            alert("debug", "cpu", "t4"),
            alert("", "cpu", "t5"),
        ];

        let counts = counts_by_level(&alerts);

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&AlertLevel::Info], 1);
        assert_eq!(counts[&AlertLevel::Warning], 2);
        assert_eq!(counts[&AlertLevel::Critical], 0);
        assert_eq!(counts.values().sum::<usize>(), 3);
    }

    #[test]
    fn filter_by_metric_keeps_only_matching_tag() {
        let alerts = vec![
            alert("info", "cpu", "t1"),
            alert("warning", "memory", "t2"),
            alert("critical", "cpu", "t3"),
        ];

        let cpu_alerts = filter_by_metric(&alerts, "cpu");

        assert_eq!(cpu_alerts.len(), 2);
        assert!(cpu_alerts.iter().all(|a| a.metric == "cpu"));
    }

    #[test]
    fn latest_alert_picks_newest() {
        let alerts = vec![
            alert("info", "cpu", "2025-12-05T09:00:00Z"),
            alert("critical", "disk", "2025-12-05T11:00:00Z"),
        ];

        assert_eq!(latest_alert(&alerts).unwrap().metric, "disk");
        assert_eq!(latest_alert(&[]), None);
    }
}
