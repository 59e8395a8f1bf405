//! Threshold-to-severity policies and value formatting shared by every panel.
//! The renderer emits these hints; terminal and web painters map them to
//! colours without re-deriving any threshold logic.

use serde::Serialize;

/// Percentage thresholds, applied identically to CPU, memory, disk and VRAM
/// usage.
pub const PERCENT_MEDIUM: f64 = 60.0;
pub const PERCENT_HIGH: f64 = 80.0;

/// Temperature thresholds in Celsius. An independent policy from the
/// percentage mapping even though the boundary values coincide.
pub const TEMP_MEDIUM: f64 = 60.0;
pub const TEMP_HIGH: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

pub fn severity_for_percentage(percent: f64) -> Severity {
    if percent < PERCENT_MEDIUM {
        Severity::Low
    } else if percent < PERCENT_HIGH {
        Severity::Medium
    } else {
        Severity::High
    }
}

pub fn severity_for_temperature(celsius: f64) -> Severity {
    if celsius < TEMP_MEDIUM {
        Severity::Low
    } else if celsius < TEMP_HIGH {
        Severity::Medium
    } else {
        Severity::High
    }
}

/// Human-readable byte count: divide by 1024 until the value fits the unit,
/// two decimal places.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// MB-to-GB display conversion used by the memory and GPU panels.
pub fn format_gb_from_mb(mb: f64) -> String {
    format!("{:.2} GB", mb / 1024.0)
}

/// Shorten a name to `max` chars with a trailing ellipsis.
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let short: String = name.chars().take(max.saturating_sub(3)).collect();
        format!("{short}...")
    }
}
