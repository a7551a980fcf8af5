use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The name is held but nothing answers behind it (holder crashed or is
    /// still starting up).
    #[error("{name} is claimed but unreachable: {source}")]
    Unreachable {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("remote call timeout must be non-zero")]
    ZeroTimeout,
    #[error("{name} did not answer within {timeout:?}")]
    Timeout { name: String, timeout: Duration },
    #[error("malformed message: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("remote {method} failed: {message}")]
    Remote { method: &'static str, message: String },
}
