use crate::models::Status;
use serde::{Deserialize, Serialize};

/// Thermal readings plus the canonical home of GPU devices. Raw documents may
/// carry GPUs under either `temperature.gpus` or `gpu.devices`; normalization
/// always emits them here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSection {
    pub status: Status,
    pub cpu_temp: Option<f64>,
    pub cpu_vendor: String,
    pub gpus: Vec<GpuDevice>,
}

impl Default for TemperatureSection {
    fn default() -> Self {
        Self {
            status: Status::Unavailable,
            cpu_temp: None,
            cpu_vendor: "N/A".to_string(),
            gpus: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuDevice {
    pub vendor: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub temperature_celsius: Option<f64>,
    pub vram_used_mb: Option<f64>,
    pub vram_total_mb: Option<f64>,
}

impl Default for GpuDevice {
    fn default() -> Self {
        Self {
            vendor: "N/A".to_string(),
            model: "N/A".to_string(),
            kind: "N/A".to_string(),
            temperature_celsius: None,
            vram_used_mb: None,
            vram_total_mb: None,
        }
    }
}
