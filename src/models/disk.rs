use serde::{Deserialize, Serialize};

/// One mounted partition. Partitions the probe marked unavailable are dropped
/// from the sequence during normalization, so entries here are always usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskPartition {
    pub device: String,
    pub mount: String,
    pub total_gb: Option<f64>,
    pub used_gb: Option<f64>,
    pub free_gb: Option<f64>,
    pub usage_percent: Option<f64>,
    pub filesystem: String,
}
