use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the alert store's write-side operations. Read-side
/// operations (`load_alerts`) are total and degrade to an empty result
/// instead of returning these.
#[derive(Debug, Error)]
pub enum AlertStoreError {
    #[error("invalid alert level '{0}', expected one of: info, warning, critical")]
    InvalidLevel(String),

    #[error("failed to read alert file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("alert file {path:?} contains invalid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write alert file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode alert file")]
    Encode(#[from] serde_json::Error),
}
