//! Metrics normalization: turns the heterogeneous raw JSON snapshots written
//! by the platform probes into one canonical, null-safe [`Metrics`] value.
//!
//! `normalize` is a total function. A missing file, unreadable permissions,
//! malformed JSON or a read that raced the probe's rewrite all degrade to
//! [`Metrics::unavailable`]; nothing here ever fails with an error.

use crate::models::cpu::CpuSection;
use crate::models::disk::DiskPartition;
use crate::models::memory::MemorySection;
use crate::models::network::{NetworkInterface, NetworkSection};
use crate::models::system::SystemSection;
use crate::models::temperature::{GpuDevice, TemperatureSection};
use crate::models::{Metrics, Status};
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Interface names excluded from network totals. Fixed rule: exact,
/// case-insensitive match only, no substring matching. Matching entries stay
/// in the interface listing.
const LOOPBACK_NAMES: [&str; 3] = ["lo", "lo0", "loopback"];

/// Load and normalize the metrics snapshot at `path`.
///
/// Never fails: any read or parse problem is logged and yields the
/// fully-degraded snapshot (every status unavailable, numerics null,
/// sequences empty, timestamp "N/A").
pub fn normalize<P: AsRef<Path>>(path: P) -> Metrics {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("metrics source {} unreadable: {}", path.display(), e);
            return Metrics::unavailable();
        }
    };

    let doc: Value = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            // Also the path taken when a read races the probe's rewrite and
            // sees a truncated document.
            warn!("metrics source {} is not valid JSON: {}", path.display(), e);
            return Metrics::unavailable();
        }
    };

    debug!("normalizing metrics snapshot from {}", path.display());
    normalize_document(&doc)
}

/// Normalize an already-parsed raw document. Idempotent over canonical input:
/// re-normalizing a serialized [`Metrics`] yields an equal value.
pub fn normalize_document(doc: &Value) -> Metrics {
    if !doc.is_object() {
        return Metrics::unavailable();
    }

    Metrics {
        timestamp: string_or(doc.get("timestamp"), "N/A"),
        platform: string_or(doc.get("platform"), "N/A"),
        system: extract_system(doc.get("system")),
        cpu: extract_cpu(doc.get("cpu")),
        memory: extract_memory(doc.get("memory")),
        disk: extract_disk(doc.get("disk")),
        network: extract_network(doc.get("network")),
        temperature: extract_temperature(doc.get("temperature"), doc.get("gpu")),
    }
}

/// Resolve a dotted path (`"cpu.usage_percent"`) through possibly-missing
/// intermediate mappings. Returns `default` when any segment is absent or
/// when the resolved value is JSON null — for this accessor only, null and
/// absent are treated identically.
pub fn get_metric_value<'a>(metrics: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    let mut current = metrics;
    for key in path.split('.') {
        match current.get(key) {
            Some(next) => current = next,
            None => return default,
        }
    }
    if current.is_null() {
        default
    } else {
        current
    }
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

fn float_of(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn uint_of(value: Option<&Value>) -> Option<u64> {
    value.and_then(Value::as_u64)
}

/// "OK" means available; anything else (including a missing status field)
/// degrades the section.
fn status_of(section: &Value) -> Status {
    match section.get("status").and_then(Value::as_str) {
        Some("OK") => Status::Ok,
        _ => Status::Unavailable,
    }
}

fn extract_system(value: Option<&Value>) -> SystemSection {
    let Some(obj) = value.filter(|v| v.is_object()) else {
        return SystemSection::default();
    };

    SystemSection {
        status: status_of(obj),
        hostname: string_or(obj.get("hostname"), "N/A"),
        os: string_or(obj.get("os"), "N/A"),
        uptime: extract_uptime(obj),
        manufacturer: string_or(obj.get("manufacturer"), "N/A"),
        model: string_or(obj.get("model"), "N/A"),
    }
}

/// Uptime arrives either preformatted (`uptime`) or as raw seconds
/// (`uptime_seconds`, the host collector shape).
fn extract_uptime(obj: &Value) -> String {
    if let Some(text) = obj.get("uptime").and_then(Value::as_str) {
        return text.to_string();
    }
    if let Some(secs) = uint_of(obj.get("uptime_seconds")) {
        return format_uptime(secs);
    }
    "N/A".to_string()
}

fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

fn extract_cpu(value: Option<&Value>) -> CpuSection {
    let Some(obj) = value.filter(|v| v.is_object()) else {
        return CpuSection::default();
    };

    let status = status_of(obj);
    if !status.is_ok() {
        return CpuSection::default();
    }

    CpuSection {
        status,
        usage_percent: float_of(obj.get("usage_percent")),
        load_average: extract_load_average(obj.get("load_average")),
        logical_processors: extract_processor_count(obj),
        vendor: string_or(obj.get("vendor"), "N/A"),
        model: string_or(obj.get("model"), "N/A"),
    }
}

/// Load average arrives as an ordered triple or as a mapping with
/// `1min`/`5min`/`15min` keys (the Windows collector shape). Both normalize
/// to the ordered triple; anything else is null.
fn extract_load_average(value: Option<&Value>) -> Option<[f64; 3]> {
    match value? {
        Value::Array(items) if items.len() >= 3 => {
            let one = items[0].as_f64()?;
            let five = items[1].as_f64()?;
            let fifteen = items[2].as_f64()?;
            Some([one, five, fifteen])
        }
        Value::Object(map) => {
            let one = map.get("1min")?.as_f64()?;
            let five = map.get("5min")?.as_f64()?;
            let fifteen = map.get("15min")?.as_f64()?;
            Some([one, five, fifteen])
        }
        _ => None,
    }
}

/// Missing or zero core counts do not raise; the field is simply left null.
/// `cores` is the legacy container-probe spelling.
fn extract_processor_count(obj: &Value) -> Option<u64> {
    uint_of(obj.get("logical_processors"))
        .or_else(|| uint_of(obj.get("cores")))
        .filter(|&count| count > 0)
}

fn extract_memory(value: Option<&Value>) -> MemorySection {
    let Some(obj) = value.filter(|v| v.is_object()) else {
        return MemorySection::default();
    };

    let status = status_of(obj);
    if !status.is_ok() {
        // Invariant: all four numerics are null together when unavailable.
        return MemorySection::default();
    }

    // Pass-through only, no used <= total validation; quantities stay in MB.
    MemorySection {
        status,
        used_mb: float_of(obj.get("used_mb")),
        total_mb: float_of(obj.get("total_mb")),
        free_mb: float_of(obj.get("free_mb")),
        usage_percent: float_of(obj.get("usage_percent")),
    }
}

fn extract_disk(value: Option<&Value>) -> Vec<DiskPartition> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            // Unavailable partitions are filtered out entirely, not nulled in
            // place; insertion order is preserved for the rest.
            if obj.get("status").and_then(Value::as_str) == Some("unavailable") {
                return None;
            }
            let device = string_or(obj.get("device"), "N/A");
            let mount = obj
                .get("mount")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| device.clone());
            Some(DiskPartition {
                mount,
                total_gb: float_of(obj.get("total_gb")),
                used_gb: float_of(obj.get("used_gb")),
                free_gb: float_of(obj.get("free_gb")),
                // `used_percent` is the host collector spelling.
                usage_percent: float_of(obj.get("usage_percent"))
                    .or_else(|| float_of(obj.get("used_percent"))),
                filesystem: string_or(obj.get("filesystem"), "N/A"),
                device,
            })
        })
        .collect()
}

/// Network arrives either as a flat interface list (totals summed here) or as
/// a pre-aggregated object carrying its own totals. Loopback-class interfaces
/// are excluded from summed totals but preserved in the listing.
fn extract_network(value: Option<&Value>) -> NetworkSection {
    match value {
        Some(Value::Array(entries)) => {
            let interfaces = extract_interfaces(entries);
            let (total_rx_bytes, total_tx_bytes) = interfaces
                .iter()
                .filter(|iface| !is_loopback(&iface.name))
                .fold((0, 0), |(rx, tx), iface| {
                    (rx + iface.rx_bytes, tx + iface.tx_bytes)
                });
            NetworkSection {
                total_rx_bytes,
                total_tx_bytes,
                interfaces,
            }
        }
        Some(Value::Object(map)) => NetworkSection {
            // Pre-aggregated totals are taken as given; the collector that
            // produced them already applied its own exclusions.
            total_rx_bytes: uint_of(map.get("total_rx_bytes")).unwrap_or(0),
            total_tx_bytes: uint_of(map.get("total_tx_bytes")).unwrap_or(0),
            interfaces: map
                .get("interfaces")
                .and_then(Value::as_array)
                .map(|entries| extract_interfaces(entries))
                .unwrap_or_default(),
        },
        _ => NetworkSection::default(),
    }
}

fn extract_interfaces(entries: &[Value]) -> Vec<NetworkInterface> {
    entries
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            // `iface` is the host collector spelling.
            let name = obj
                .get("name")
                .or_else(|| obj.get("iface"))
                .and_then(Value::as_str)?
                .to_string();
            Some(NetworkInterface {
                name,
                rx_bytes: uint_of(obj.get("rx_bytes")).unwrap_or(0),
                tx_bytes: uint_of(obj.get("tx_bytes")).unwrap_or(0),
            })
        })
        .collect()
}

fn is_loopback(name: &str) -> bool {
    LOOPBACK_NAMES
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
}

/// GPUs live under `gpu.devices` (host collector) or `temperature.gpus`
/// (container collector). Exactly one source is read, preferring
/// `gpu.devices` when present; canonical output always carries them under
/// `temperature.gpus`.
fn extract_temperature(temp: Option<&Value>, gpu: Option<&Value>) -> TemperatureSection {
    let mut section = match temp.filter(|v| v.is_object()) {
        Some(obj) => TemperatureSection {
            status: status_of(obj),
            // `cpu_celsius` is the host collector spelling.
            cpu_temp: float_of(obj.get("cpu_temp")).or_else(|| float_of(obj.get("cpu_celsius"))),
            cpu_vendor: string_or(obj.get("cpu_vendor"), "N/A"),
            gpus: Vec::new(),
        },
        None => TemperatureSection::default(),
    };

    let devices = gpu
        .filter(|v| v.is_object())
        .and_then(|obj| obj.get("devices"))
        .and_then(Value::as_array);

    section.gpus = match devices {
        Some(entries) => extract_gpus(entries),
        None => temp
            .and_then(|obj| obj.get("gpus"))
            .and_then(Value::as_array)
            .map(|entries| extract_gpus(entries))
            .unwrap_or_default(),
    };

    section
}

fn extract_gpus(entries: &[Value]) -> Vec<GpuDevice> {
    entries
        .iter()
        .filter_map(|entry| {
            if !entry.is_object() {
                return None;
            }
            Some(GpuDevice {
                vendor: string_or(entry.get("vendor"), "N/A"),
                model: string_or(entry.get("model"), "N/A"),
                kind: string_or(entry.get("type"), "N/A"),
                temperature_celsius: float_of(entry.get("temperature_celsius")),
                // `memory_*_mb` is the host collector spelling.
                vram_used_mb: float_of(entry.get("vram_used_mb"))
                    .or_else(|| float_of(entry.get("memory_used_mb"))),
                vram_total_mb: float_of(entry.get("vram_total_mb"))
                    .or_else(|| float_of(entry.get("memory_total_mb"))),
            })
        })
        .collect()
}
