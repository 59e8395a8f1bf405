use crate::models::Status;
use serde::{Deserialize, Serialize};

/// Memory quantities stay in MB in canonical form; GB conversion is a
/// rendering concern. All four numerics are null together when the section
/// is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MemorySection {
    pub status: Status,
    pub used_mb: Option<f64>,
    pub total_mb: Option<f64>,
    pub free_mb: Option<f64>,
    pub usage_percent: Option<f64>,
}
