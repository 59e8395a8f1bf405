use serde::{Deserialize, Serialize};

pub mod alert;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;
pub mod system;
pub mod temperature;

/// Availability marker carried by every metrics section. A section that the
/// probe could not populate is "unavailable"; its numeric fields are null and
/// its sequences are empty, but the section itself is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "unavailable")]
    #[default]
    Unavailable,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

/// Canonical metrics snapshot. Every leaf is present as a value or an explicit
/// unavailable sentinel regardless of which probe produced the raw document.
/// Sections degrade independently: a failure in one never blanks out another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub timestamp: String,
    pub platform: String,
    pub system: system::SystemSection,
    pub cpu: cpu::CpuSection,
    pub memory: memory::MemorySection,
    pub disk: Vec<disk::DiskPartition>,
    pub network: network::NetworkSection,
    pub temperature: temperature::TemperatureSection,
}

impl Metrics {
    /// The fully-degraded snapshot returned when the source file is missing,
    /// unreadable or malformed.
    pub fn unavailable() -> Self {
        Self {
            timestamp: "N/A".to_string(),
            platform: "N/A".to_string(),
            system: system::SystemSection::default(),
            cpu: cpu::CpuSection::default(),
            memory: memory::MemorySection::default(),
            disk: Vec::new(),
            network: network::NetworkSection::default(),
            temperature: temperature::TemperatureSection::default(),
        }
    }
}
