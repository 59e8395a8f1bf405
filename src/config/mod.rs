use anyhow::{Context, Result};
use config::{Config, File};
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub metrics_file: String,
    pub alerts_file: String,
    /// Refresh cadence in seconds. A cooperative sleep between cycles, not a
    /// hard deadline.
    pub polling: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            metrics_file: "data/metrics/current.json".to_string(),
            alerts_file: "data/alerts/alerts.json".to_string(),
            polling: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(rename = "MONITOR", default)]
    pub monitor: MonitorConfig,
    #[serde(rename = "LOGGING", default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_file("config.ini")
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(
                File::with_name(config_path.to_str().unwrap_or(""))
                    .format(config::FileFormat::Ini),
            )
            .build()
            .context(format!(
                "Failed to load config from {}",
                config_path.display()
            ))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        // MONITOR section
        config_str.push_str(&format!(
            "[MONITOR]\nmetrics_file = {}\nalerts_file = {}\npolling = {}\n\n",
            self.monitor.metrics_file, self.monitor.alerts_file, self.monitor.polling
        ));

        // LOGGING section
        config_str.push_str(&format!("[LOGGING]\nlevel = {}\n", self.logging.level));

        fs::write(config_path, config_str).context(format!(
            "Failed to save config to {}",
            config_path.display()
        ))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}
