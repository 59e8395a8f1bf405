use crate::models::Status;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSection {
    pub status: Status,
    pub hostname: String,
    pub os: String,
    pub uptime: String,
    pub manufacturer: String,
    pub model: String,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            status: Status::Unavailable,
            hostname: "N/A".to_string(),
            os: "N/A".to_string(),
            uptime: "N/A".to_string(),
            manufacturer: "N/A".to_string(),
            model: "N/A".to_string(),
        }
    }
}
