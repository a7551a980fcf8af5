//! Seam to the evaluation backend: the runtime that executes command lines,
//! runs garbage collection and hosts the inspector.
//!
//! Health is asynchronous. `refresh_status` starts a one-shot check and the
//! answer comes back over the event channel the loop drains.
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    StatusChanged { healthy: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no evaluation backend is attached")]
    Offline,
    #[error("{0}")]
    Failed(String),
}

pub trait EvalBackend {
    /// Evaluate one submitted command line.
    fn eval(&mut self, code: &str) -> Result<(), BackendError>;

    fn full_gc(&mut self) -> Result<(), BackendError>;

    /// Start the element inspector (picker).
    fn start_inspector(&mut self) -> Result<(), BackendError>;

    fn refresh_status(&mut self);
}

/// Backend used when nothing is attached. Every request fails with
/// [`BackendError::Offline`] and every status refresh reports unhealthy.
pub struct OfflineBackend {
    events_tx: Sender<BackendEvent>,
}

impl OfflineBackend {
    pub fn new(events_tx: Sender<BackendEvent>) -> Self {
        Self { events_tx }
    }
}

impl EvalBackend for OfflineBackend {
    fn eval(&mut self, _code: &str) -> Result<(), BackendError> {
        Err(BackendError::Offline)
    }

    fn full_gc(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Offline)
    }

    fn start_inspector(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Offline)
    }

    fn refresh_status(&mut self) {
        let _ = self.events_tx.send(BackendEvent::StatusChanged { healthy: false });
    }
}
