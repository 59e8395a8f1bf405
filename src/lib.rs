pub mod alerts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod normalizer;

use crate::config::AppConfig;
use crate::dashboard::RenderModel;
use anyhow::Context;
use log::{debug, error, info};
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Consumer of rendered dashboard models. Terminal and web surfaces implement
/// this; the refresh loop stays ignorant of how the model is displayed.
pub trait RenderSink {
    fn publish(&mut self, model: &RenderModel) -> anyhow::Result<()>;
}

/// Writes each render model as one JSON line. The default sink for the
/// binary; any presentation layer can consume the stream without re-deriving
/// severity or threshold logic.
pub struct JsonLineSink<W: Write> {
    out: W,
}

impl JsonLineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderSink for JsonLineSink<W> {
    fn publish(&mut self, model: &RenderModel) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, model).context("Failed to encode render model")?;
        self.out.write_all(b"\n").context("Failed to write render model")?;
        self.out.flush().context("Failed to flush render model")?;
        Ok(())
    }
}

/// One full refresh cycle: re-read both source files fresh and render.
///
/// Both reads are total; a missing or corrupt source renders as the degraded
/// state for this cycle. Nothing is cached between cycles — the on-disk
/// files are the single source of truth.
pub fn refresh_cycle(config: &AppConfig) -> RenderModel {
    let metrics = normalizer::normalize(&config.monitor.metrics_file);
    let alerts = alerts::load_alerts(&config.monitor.alerts_file, None, None);
    dashboard::render(&metrics, &alerts)
}

/// Drive repeated refresh cycles at the configured cadence until `shutdown`
/// fires.
///
/// One cycle runs to completion before the next begins; a slow cycle delays
/// the next tick rather than overlapping it. Cancellation is polled at the
/// tick boundary, so an in-flight cycle (and any alert-file rewrite inside
/// it) always completes before the loop exits.
pub async fn refresh_loop<S: RenderSink>(
    config: &AppConfig,
    sink: &mut S,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let cadence = Duration::from_secs(config.monitor.polling.max(1));
    let mut interval = tokio::time::interval(cadence);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "starting refresh loop: metrics={} alerts={} every {}s",
        config.monitor.metrics_file,
        config.monitor.alerts_file,
        cadence.as_secs()
    );

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                info!("shutdown requested, stopping refresh loop");
                break;
            }
            _ = interval.tick() => {
                debug!("refresh cycle starting");
                let model = refresh_cycle(config);
                if let Err(e) = sink.publish(&model) {
                    // Publish failures degrade this cycle only; the loop
                    // carries on.
                    error!("failed to publish render model: {e:#}");
                }
            }
        }
    }

    Ok(())
}

/// Entry point for the binary: installs the Ctrl-C handler and runs the
/// refresh loop against a JSON-lines stdout sink until cancelled.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting application");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut sink = JsonLineSink::stdout();
    refresh_loop(&config, &mut sink, shutdown_rx)
        .await
        .context("Refresh loop failed")?;

    info!("Application stopped");
    Ok(())
}
