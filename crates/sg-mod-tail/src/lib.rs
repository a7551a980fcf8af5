//! Tail arbitrary text files into views, rate limited per file.
//!
//! Filesystem notifications arrive on a background thread and are forwarded
//! as [`TailEvent`]s. The owner of the [`TailSet`] feeds them back in through
//! [`TailSet::notify`] from its event loop and calls [`TailSet::fire_due`] on
//! every tick; only then is a file re-read. Per file, re-reads are serialized
//! and happen at most once per debounce window.
pub mod debounce;
pub mod session;
pub mod watcher;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

pub use debounce::Debouncer;
pub use session::{TailSession, TailView};
pub use watcher::TailWatcher;

/// Identifies one open file tab. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TailId(pub u64);

impl fmt::Display for TailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tail#{}", self.0)
    }
}

/// "The file behind `id` changed." Carries no content; content is read when
/// the debounced refresh fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailEvent {
    pub id: TailId,
}

#[derive(Debug, thiserror::Error)]
pub enum TailError {
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot watch {}: {source}", .path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// All watched files of one controller.
pub struct TailSet {
    sessions: BTreeMap<TailId, TailSession>,
    debouncer: Debouncer<TailId>,
    delay: Duration,
    events_tx: Sender<TailEvent>,
    next_id: u64,
}

impl TailSet {
    pub fn new(delay: Duration, events_tx: Sender<TailEvent>) -> Self {
        Self { sessions: BTreeMap::new(), debouncer: Debouncer::new(), delay, events_tx, next_id: 1 }
    }

    /// Open a watch: read and render once synchronously, then subscribe.
    pub fn open(&mut self, label: impl Into<String>, path: &Path) -> Result<TailId, TailError> {
        if !path.is_file() {
            return Err(TailError::NotAFile(path.to_path_buf()));
        }
        let id = TailId(self.next_id);
        let mut session = TailSession::new(id, label.into(), path.to_path_buf());
        session.reread()?;
        let watcher = TailWatcher::spawn(id, path, self.events_tx.clone())
            .map_err(|source| TailError::Watch { path: path.to_path_buf(), source })?;
        session.attach(watcher);

        self.next_id += 1;
        tracing::info!(%id, path = %path.display(), "file watch opened");
        self.sessions.insert(id, session);
        Ok(id)
    }

    /// Close a watch. The subscription and any pending refresh are cancelled
    /// before this returns; later events for `id` are ignored.
    pub fn close(&mut self, id: TailId) -> bool {
        self.debouncer.cancel(&id);
        match self.sessions.remove(&id) {
            Some(mut session) => {
                session.cancel();
                tracing::info!(%id, path = %session.path().display(), "file watch closed");
                true
            }
            None => false,
        }
    }

    pub fn close_all(&mut self) {
        let ids: Vec<TailId> = self.sessions.keys().copied().collect();
        for id in ids {
            self.close(id);
        }
    }

    /// Feed one change notification. Returns whether a refresh was armed
    /// (false when one is already pending or the session is gone).
    pub fn notify(&mut self, event: TailEvent, now: Instant) -> bool {
        if !self.sessions.contains_key(&event.id) {
            return false;
        }
        self.debouncer.request(event.id, self.delay, (), now)
    }

    /// Run every refresh whose window has elapsed. Returns the sessions whose
    /// view was re-rendered. Read failures are logged and leave the view as is.
    pub fn fire_due(&mut self, now: Instant) -> Vec<TailId> {
        let mut rendered = Vec::new();
        for (id, ()) in self.debouncer.take_due(now) {
            let Some(session) = self.sessions.get_mut(&id) else { continue };
            match session.reread() {
                Ok(()) => rendered.push(id),
                Err(e) => tracing::warn!(%id, error = %e, "refresh skipped, keeping last content"),
            }
        }
        rendered
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    pub fn is_refresh_pending(&self, id: TailId) -> bool {
        self.debouncer.is_pending(&id)
    }

    pub fn get(&self, id: TailId) -> Option<&TailSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: TailId) -> Option<&mut TailSession> {
        self.sessions.get_mut(&id)
    }

    /// Sessions in the order they were opened.
    pub fn iter(&self) -> impl Iterator<Item = &TailSession> {
        self.sessions.values()
    }

    pub fn ids(&self) -> Vec<TailId> {
        self.sessions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Drop for TailSet {
    fn drop(&mut self) {
        self.close_all();
    }
}
