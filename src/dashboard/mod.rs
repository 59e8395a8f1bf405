//! Dashboard renderer: builds a platform-neutral, serializable panel tree
//! from one canonical metrics snapshot and an alert list. The model carries
//! data plus styling hints (severity, dimming, gauges) and never raw terminal
//! escape codes or HTML; terminal and web painters consume it as-is.

pub mod style;

use crate::alerts::counts_by_level;
use crate::models::alert::{Alert, AlertLevel};
use crate::models::network::NetworkInterface;
use crate::models::temperature::GpuDevice;
use crate::models::Metrics;
use indexmap::IndexMap;
use serde::Serialize;
use style::{
    format_bytes, format_gb_from_mb, severity_for_percentage, severity_for_temperature,
    truncate_name, Severity,
};

/// Most partitions the disk panel will list, in canonical order.
pub const DISK_ROW_LIMIT: usize = 10;
/// Most interfaces the network panel will list, busiest first.
pub const TOP_INTERFACES: usize = 3;
/// Most alerts shown in the footer, regardless of input length.
pub const ALERT_DISPLAY_LIMIT: usize = 3;

const MODEL_NAME_WIDTH: usize = 40;
const GPU_MODEL_WIDTH: usize = 30;
const INTERFACE_NAME_WIDTH: usize = 15;

#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub header: HeaderPanel,
    pub cpu: Panel,
    pub memory: Panel,
    pub disk: Panel,
    pub network: Panel,
    pub temperature: Panel,
    pub gpu: Panel,
    pub alerts: AlertsPanel,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderPanel {
    pub title: String,
    pub hostname: String,
    pub platform: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub title: String,
    /// Worst severity among the panel's cells; painters use it for borders.
    pub severity: Severity,
    pub rows: Vec<Row>,
}

impl Panel {
    fn new(title: &str, rows: Vec<Row>) -> Self {
        let severity = rows
            .iter()
            .filter_map(|row| row.value.severity)
            .max()
            .unwrap_or(Severity::Low);
        Self {
            title: title.to_string(),
            severity,
            rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub label: String,
    pub value: Cell,
}

impl Row {
    fn new(label: &str, value: Cell) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// One rendered value: display text plus styling hints. A `gauge` carries the
/// raw percentage so painters can draw a bar without reparsing the text.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub dim: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<f64>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: None,
            dim: false,
            gauge: None,
        }
    }

    fn dim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: None,
            dim: true,
            gauge: None,
        }
    }

    fn na() -> Self {
        Self::dim("N/A")
    }

    fn graded(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity: Some(severity),
            dim: false,
            gauge: None,
        }
    }

    fn gauge(text: impl Into<String>, severity: Severity, percent: f64) -> Self {
        Self {
            text: text.into(),
            severity: Some(severity),
            dim: false,
            gauge: Some(percent),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertsPanel {
    pub title: String,
    pub total: usize,
    pub counts: IndexMap<AlertLevel, usize>,
    /// High when any supplied alert is critical (displayed or not), Medium
    /// when any alert is present, Low otherwise.
    pub severity: Severity,
    pub entries: Vec<AlertEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertEntry {
    pub level: String,
    pub message: String,
}

/// Render the complete dashboard model. Each panel is independently
/// null-safe: unavailable sections come out as dimmed "N/A" cells, never as
/// errors.
pub fn render(metrics: &Metrics, alerts: &[Alert]) -> RenderModel {
    RenderModel {
        header: header_panel(metrics),
        cpu: cpu_panel(metrics),
        memory: memory_panel(metrics),
        disk: disk_panel(metrics),
        network: network_panel(metrics),
        temperature: temperature_panel(metrics),
        gpu: gpu_panel(metrics),
        alerts: alerts_panel(alerts),
    }
}

fn header_panel(metrics: &Metrics) -> HeaderPanel {
    HeaderPanel {
        title: "SYSTEM MONITOR DASHBOARD".to_string(),
        hostname: metrics.system.hostname.clone(),
        platform: metrics.platform.clone(),
        timestamp: metrics.timestamp.clone(),
    }
}

fn cpu_panel(metrics: &Metrics) -> Panel {
    let cpu = &metrics.cpu;
    let mut rows = Vec::new();

    rows.push(Row::new(
        "Usage",
        match cpu.usage_percent {
            Some(percent) => Cell::gauge(
                format!("{percent:.1}%"),
                severity_for_percentage(percent),
                percent,
            ),
            None => Cell::na(),
        },
    ));

    rows.push(Row::new(
        "Load (1/5/15)",
        match cpu.load_average {
            Some([one, five, fifteen]) => {
                Cell::plain(format!("{one:.2}, {five:.2}, {fifteen:.2}"))
            }
            None => Cell::na(),
        },
    ));

    if let Some(count) = cpu.logical_processors {
        rows.push(Row::new(
            "Cores",
            Cell::plain(format!("{count} ({})", cpu.vendor)),
        ));
    }

    if cpu.model != "N/A" {
        rows.push(Row::new(
            "Model",
            Cell::dim(truncate_name(&cpu.model, MODEL_NAME_WIDTH)),
        ));
    }

    rows.push(Row::new("Temp", cpu_temp_cell(metrics)));

    Panel::new("CPU", rows)
}

fn cpu_temp_cell(metrics: &Metrics) -> Cell {
    match metrics.temperature.cpu_temp {
        Some(temp) if temp > 0.0 => Cell::graded(
            format!("{temp:.1}°C"),
            severity_for_temperature(temp),
        ),
        _ => Cell::na(),
    }
}

fn memory_panel(metrics: &Metrics) -> Panel {
    let memory = &metrics.memory;
    let mut rows = Vec::new();

    rows.push(Row::new(
        "Used",
        match (memory.used_mb, memory.total_mb) {
            (Some(used), Some(total)) => Cell::plain(format!(
                "{} / {}",
                format_gb_from_mb(used),
                format_gb_from_mb(total)
            )),
            _ => Cell::na(),
        },
    ));

    rows.push(Row::new(
        "Usage",
        match memory.usage_percent {
            Some(percent) => Cell::gauge(
                format!("{percent:.1}%"),
                severity_for_percentage(percent),
                percent,
            ),
            None => Cell::na(),
        },
    ));

    if let Some(free) = memory.free_mb {
        rows.push(Row::new("Free", Cell::plain(format_gb_from_mb(free))));
    }

    Panel::new("MEMORY", rows)
}

fn disk_panel(metrics: &Metrics) -> Panel {
    if metrics.disk.is_empty() {
        return Panel::new(
            "DISK",
            vec![Row::new("", Cell::dim("No disk information available"))],
        );
    }

    // First N partitions in canonical order; no re-sorting.
    let rows = metrics
        .disk
        .iter()
        .take(DISK_ROW_LIMIT)
        .map(|disk| {
            let sizes = match (disk.used_gb, disk.total_gb) {
                (Some(used), Some(total)) => Some(format!("{used:.1}/{total:.1} GB")),
                _ => None,
            };
            let cell = match disk.usage_percent {
                Some(percent) => {
                    let text = match sizes {
                        Some(sizes) => format!("{percent:.1}% ({sizes})"),
                        None => format!("{percent:.1}%"),
                    };
                    Cell::gauge(text, severity_for_percentage(percent), percent)
                }
                None => match sizes {
                    Some(sizes) => Cell::plain(sizes),
                    None => Cell::na(),
                },
            };
            Row::new(&disk.device, cell)
        })
        .collect();

    Panel::new("DISK", rows)
}

fn network_panel(metrics: &Metrics) -> Panel {
    let network = &metrics.network;
    let mut rows = vec![
        Row::new("Total RX", Cell::plain(format_bytes(network.total_rx_bytes))),
        Row::new("Total TX", Cell::plain(format_bytes(network.total_tx_bytes))),
    ];

    for iface in top_interfaces(&network.interfaces) {
        rows.push(Row::new(
            &truncate_name(&iface.name, INTERFACE_NAME_WIDTH),
            Cell::plain(format!(
                "RX {} | TX {}",
                format_bytes(iface.rx_bytes),
                format_bytes(iface.tx_bytes)
            )),
        ));
    }

    Panel::new("NETWORK", rows)
}

/// Busiest interfaces by combined traffic, descending. Zero-traffic
/// interfaces never appear, even when fewer than the limit qualify.
fn top_interfaces(interfaces: &[NetworkInterface]) -> Vec<&NetworkInterface> {
    let mut active: Vec<&NetworkInterface> = interfaces
        .iter()
        .filter(|iface| iface.rx_bytes > 0 || iface.tx_bytes > 0)
        .collect();
    active.sort_by(|a, b| (b.rx_bytes + b.tx_bytes).cmp(&(a.rx_bytes + a.tx_bytes)));
    active.truncate(TOP_INTERFACES);
    active
}

fn temperature_panel(metrics: &Metrics) -> Panel {
    let temp = &metrics.temperature;
    let cell = match temp.cpu_temp {
        Some(celsius) if celsius > 0.0 => Cell::graded(
            format!("{celsius:.1}°C ({})", temp.cpu_vendor),
            severity_for_temperature(celsius),
        ),
        _ => Cell::dim(format!("N/A ({})", temp.cpu_vendor)),
    };

    Panel::new("TEMPERATURE", vec![Row::new("CPU", cell)])
}

/// Headline GPU: the first whose vendor contains "nvidia" (case-insensitive),
/// else the first in the sequence.
pub fn select_primary_gpu(gpus: &[GpuDevice]) -> Option<&GpuDevice> {
    gpus.iter()
        .find(|gpu| gpu.vendor.to_lowercase().contains("nvidia"))
        .or_else(|| gpus.first())
}

fn gpu_panel(metrics: &Metrics) -> Panel {
    let gpus = &metrics.temperature.gpus;
    let Some(primary) = select_primary_gpu(gpus) else {
        return Panel::new(
            "GPU",
            vec![Row::new("Temp", Cell::na()), Row::new("Vendor", Cell::na())],
        );
    };

    let mut rows = Vec::new();

    rows.push(Row::new(
        "Temp",
        match primary.temperature_celsius {
            Some(temp) if temp > 0.0 => Cell::graded(
                format!("{temp:.1}°C"),
                severity_for_temperature(temp),
            ),
            _ => Cell::na(),
        },
    ));

    rows.push(Row::new("Vendor", Cell::plain(&primary.vendor)));

    if primary.model != "N/A" {
        rows.push(Row::new(
            "Model",
            Cell::plain(truncate_name(&primary.model, GPU_MODEL_WIDTH)),
        ));
    }

    if primary.kind != "N/A" {
        rows.push(Row::new("Type", Cell::plain(&primary.kind)));
    }

    if let (Some(used), Some(total)) = (primary.vram_used_mb, primary.vram_total_mb) {
        if total > 0.0 {
            let percent = used / total * 100.0;
            rows.push(Row::new(
                "VRAM",
                Cell::plain(format!(
                    "{} / {}",
                    format_gb_from_mb(used),
                    format_gb_from_mb(total)
                )),
            ));
            rows.push(Row::new(
                "VRAM Usage",
                Cell::gauge(
                    format!("{percent:.1}%"),
                    severity_for_percentage(percent),
                    percent,
                ),
            ));
        }
    }

    if gpus.len() > 1 {
        rows.push(Row::new(
            "GPUs",
            Cell::dim(format!("{} detected", gpus.len())),
        ));
    }

    Panel::new("GPU", rows)
}

fn alerts_panel(alerts: &[Alert]) -> AlertsPanel {
    // Escalation looks at the full supplied list, not just the displayed few.
    let severity = if alerts.iter().any(|a| a.known_level() == Some(AlertLevel::Critical)) {
        Severity::High
    } else if alerts.is_empty() {
        Severity::Low
    } else {
        Severity::Medium
    };

    let entries = alerts
        .iter()
        .take(ALERT_DISPLAY_LIMIT)
        .map(|alert| AlertEntry {
            level: alert.level.clone(),
            message: alert.message.clone(),
        })
        .collect();

    AlertsPanel {
        title: format!("ALERTS ({})", alerts.len()),
        total: alerts.len(),
        counts: counts_by_level(alerts),
        severity,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::disk::DiskPartition;
    use crate::models::{Metrics, Status};

    fn metrics_with_disks(count: usize) -> Metrics {
        let mut metrics = Metrics::unavailable();
        metrics.disk = (0..count)
            .map(|i| DiskPartition {
                device: format!("sd{i}"),
                mount: format!("/mnt/{i}"),
                total_gb: Some(100.0),
                used_gb: Some(50.0),
                free_gb: Some(50.0),
                usage_percent: Some(50.0),
                filesystem: "ext4".to_string(),
            })
            .collect();
        metrics
    }

    fn gpu(vendor: &str) -> GpuDevice {
        GpuDevice {
            vendor: vendor.to_string(),
            ..GpuDevice::default()
        }
    }

    fn alert(level: &str, message: &str) -> Alert {
        Alert {
            level: level.to_string(),
            metric: "cpu".to_string(),
            message: message.to_string(),
            value: None,
            threshold: None,
            timestamp: "2025-12-05T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn degraded_metrics_render_without_panicking() {
        let model = render(&Metrics::unavailable(), &[]);

        assert_eq!(model.header.hostname, "N/A");
        assert!(model.cpu.rows.iter().any(|r| r.value.dim));
        assert_eq!(model.cpu.severity, Severity::Low);
        assert_eq!(model.alerts.severity, Severity::Low);
        assert_eq!(model.network.rows[0].value.text, "0.00 B");
    }

    #[test]
    fn disk_panel_caps_at_ten_and_preserves_order() {
        let metrics = metrics_with_disks(50);
        let model = render(&metrics, &[]);

        assert_eq!(model.disk.rows.len(), DISK_ROW_LIMIT);
        let labels: Vec<&str> = model.disk.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels[0], "sd0");
        assert_eq!(labels[9], "sd9");
    }

    #[test]
    fn disk_severity_reflects_worst_partition() {
        let mut metrics = metrics_with_disks(2);
        metrics.disk[1].usage_percent = Some(92.0);
        let model = render(&metrics, &[]);

        assert_eq!(model.disk.severity, Severity::High);
    }

    #[test]
    fn network_panel_drops_zero_traffic_interfaces() {
        let mut metrics = Metrics::unavailable();
        metrics.network.interfaces = vec![
            NetworkInterface { name: "idle0".into(), rx_bytes: 0, tx_bytes: 0 },
            NetworkInterface { name: "eth1".into(), rx_bytes: 100, tx_bytes: 0 },
            NetworkInterface { name: "eth0".into(), rx_bytes: 5_000, tx_bytes: 5_000 },
            NetworkInterface { name: "eth2".into(), rx_bytes: 300, tx_bytes: 300 },
            NetworkInterface { name: "eth3".into(), rx_bytes: 200, tx_bytes: 200 },
        ];
        let model = render(&metrics, &[]);

        // Two totals rows, then at most three interfaces, busiest first.
        let labels: Vec<&str> = model.network.rows[2..]
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, ["eth0", "eth2", "eth3"]);
    }

    #[test]
    fn nvidia_gpu_preferred_regardless_of_position() {
        let gpus = vec![gpu("AMD"), gpu("NVIDIA"), gpu("Intel")];
        assert_eq!(select_primary_gpu(&gpus).unwrap().vendor, "NVIDIA");

        let gpus = vec![gpu("AMD"), gpu("Intel")];
        assert_eq!(select_primary_gpu(&gpus).unwrap().vendor, "AMD");

        assert!(select_primary_gpu(&[]).is_none());
    }

    #[test]
    fn gpu_panel_reports_count_when_multiple() {
        let mut metrics = Metrics::unavailable();
        metrics.temperature.gpus = vec![gpu("AMD"), gpu("NVIDIA")];
        let model = render(&metrics, &[]);

        assert!(model
            .gpu
            .rows
            .iter()
            .any(|r| r.label == "GPUs" && r.value.text == "2 detected"));
        // Primary is the NVIDIA entry.
        assert!(model
            .gpu
            .rows
            .iter()
            .any(|r| r.label == "Vendor" && r.value.text == "NVIDIA"));
    }

    #[test]
    fn vram_usage_uses_percentage_severity() {
        let mut metrics = Metrics::unavailable();
        metrics.temperature.gpus = vec![GpuDevice {
            vendor: "NVIDIA".to_string(),
            vram_used_mb: Some(9_216.0),
            vram_total_mb: Some(10_240.0),
            ..GpuDevice::default()
        }];
        let model = render(&metrics, &[]);

        let usage = model
            .gpu
            .rows
            .iter()
            .find(|r| r.label == "VRAM Usage")
            .unwrap();
        assert_eq!(usage.value.severity, Some(Severity::High));
        assert_eq!(usage.value.text, "90.0%");
    }

    #[test]
    fn alerts_panel_caps_display_but_escalates_from_full_list() {
        let alerts = vec![
            alert("info", "one"),
            alert("info", "two"),
            alert("info", "three"),
            alert("critical", "buried"),
        ];
        let panel = alerts_panel(&alerts);

        assert_eq!(panel.entries.len(), ALERT_DISPLAY_LIMIT);
        assert_eq!(panel.severity, Severity::High);
        assert_eq!(panel.total, 4);
        assert_eq!(panel.counts[&AlertLevel::Critical], 1);
    }

    #[test]
    fn alerts_panel_without_critical_is_medium() {
        let panel = alerts_panel(&[alert("warning", "w")]);
        assert_eq!(panel.severity, Severity::Medium);
        assert_eq!(panel.title, "ALERTS (1)");
    }

    #[test]
    fn memory_panel_converts_mb_to_gb_for_display() {
        let mut metrics = Metrics::unavailable();
        metrics.memory.status = Status::Ok;
        metrics.memory.used_mb = Some(8_192.0);
        metrics.memory.total_mb = Some(16_384.0);
        metrics.memory.usage_percent = Some(50.0);
        let model = render(&metrics, &[]);

        assert_eq!(model.memory.rows[0].value.text, "8.00 GB / 16.00 GB");
        assert_eq!(model.memory.rows[1].value.gauge, Some(50.0));
    }

    #[test]
    fn render_model_serializes_to_plain_data() {
        let model = render(&Metrics::unavailable(), &[alert("critical", "disk full")]);
        let value = serde_json::to_value(&model).unwrap();

        assert_eq!(value["alerts"]["severity"], "high");
        assert_eq!(value["header"]["timestamp"], "N/A");
        assert!(value["cpu"]["rows"].is_array());
    }
}
