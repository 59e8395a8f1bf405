use crate::models::Status;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSection {
    pub status: Status,
    pub usage_percent: Option<f64>,
    /// 1/5/15-minute load averages, always an ordered triple in canonical form.
    pub load_average: Option<[f64; 3]>,
    pub logical_processors: Option<u64>,
    pub vendor: String,
    pub model: String,
}

impl Default for CpuSection {
    fn default() -> Self {
        Self {
            status: Status::Unavailable,
            usage_percent: None,
            load_average: None,
            logical_processors: None,
            vendor: "N/A".to_string(),
            model: "N/A".to_string(),
        }
    }
}
