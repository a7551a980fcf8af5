//! Filesystem subscription for one tailed file.
//!
//! notify delivers events on its own thread. The handler here only forwards a
//! [`TailEvent`] over a channel; the event loop owns every session and does
//! all reads and view updates itself.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use notify::event::{AccessKind, AccessMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::{TailEvent, TailId};

/// Create, modify, delete and close-after-write. Plain opens and reads are noise.
fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(_)
            | EventKind::Remove(_)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}

/// Live subscription. Dropping it cancels the subscription.
pub struct TailWatcher {
    watcher: RecommendedWatcher,
    /// Directory actually registered with the backend
    watched_dir: PathBuf,
    cancelled: Arc<AtomicBool>,
}

impl TailWatcher {
    /// Subscribe to changes of `path`.
    ///
    /// The parent directory is watched rather than the file itself so that a
    /// file deleted and recreated (log rotation, editors saving via rename)
    /// keeps producing events for the new inode.
    pub fn spawn(id: TailId, path: &Path, tx: Sender<TailEvent>) -> notify::Result<Self> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let file_name = canonical.file_name().map(|n| n.to_os_string());
        let watched_dir = match canonical.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if flag.load(Ordering::Acquire) {
                    return;
                }
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(id = %id, error = %e, "watch backend error");
                        return;
                    }
                };
                if !is_content_change(&event.kind) {
                    return;
                }
                let ours = event.paths.iter().any(|p| p.file_name() == file_name.as_deref());
                if ours {
                    let _ = tx.send(TailEvent { id });
                }
            },
            Config::default(),
        )?;
        watcher.watch(&watched_dir, RecursiveMode::NonRecursive)?;

        Ok(Self { watcher, watched_dir, cancelled })
    }

    /// Stop forwarding events. Effective immediately for the handler; an event
    /// already in flight on the channel is discarded by the session owner
    /// because the id is gone by then.
    pub fn cancel(&mut self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.watcher.unwatch(&self.watched_dir);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for TailWatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
