use std::fs;
use std::path::{Path, PathBuf};

use crate::watcher::TailWatcher;
use crate::{TailError, TailId};

/// Scroll state of a tailed file's view.
///
/// New content only *requests* a scroll to the end. The request is resolved
/// by [`TailView::layout`], which the renderer calls once it knows the
/// viewport height, so the offset is always computed against the laid-out
/// content rather than whatever was on screen when the file was read.
#[derive(Debug, Default, Clone)]
pub struct TailView {
    text: String,
    line_count: usize,
    scroll: usize,
    scroll_to_end: bool,
    last_viewport: usize,
}

impl TailView {
    pub fn set_content(&mut self, bytes: &[u8]) {
        self.text = String::from_utf8_lossy(bytes).into_owned();
        self.line_count = self.text.lines().count();
        self.scroll_to_end = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn scroll_pending(&self) -> bool {
        self.scroll_to_end
    }

    /// Layout pass: clamp the offset to the viewport and resolve a pending
    /// scroll-to-end. Returns the top line to draw.
    pub fn layout(&mut self, viewport_height: usize) -> usize {
        self.last_viewport = viewport_height;
        let max_scroll = self.line_count.saturating_sub(viewport_height);
        if self.scroll_to_end {
            self.scroll = max_scroll;
            self.scroll_to_end = false;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
        self.scroll
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max_scroll = self.line_count.saturating_sub(self.last_viewport);
        self.scroll = (self.scroll + lines).min(max_scroll);
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }
}

/// One open file tab.
pub struct TailSession {
    id: TailId,
    label: String,
    path: PathBuf,
    last_content: Vec<u8>,
    view: TailView,
    watcher: Option<TailWatcher>,
}

impl TailSession {
    pub(crate) fn new(id: TailId, label: String, path: PathBuf) -> Self {
        Self { id, label, path, last_content: Vec::new(), view: TailView::default(), watcher: None }
    }

    pub(crate) fn attach(&mut self, watcher: TailWatcher) {
        self.watcher = Some(watcher);
    }

    /// Re-read the whole file and render it.
    ///
    /// On failure the view keeps the last good content.
    pub(crate) fn reread(&mut self) -> Result<(), TailError> {
        let bytes = fs::read(&self.path).map_err(|source| TailError::Read { path: self.path.clone(), source })?;
        self.view.set_content(&bytes);
        self.last_content = bytes;
        Ok(())
    }

    /// Cancel the subscription now rather than whenever the session is dropped.
    pub(crate) fn cancel(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.cancel();
        }
    }

    pub fn id(&self) -> TailId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_content(&self) -> &[u8] {
        &self.last_content
    }

    pub fn view(&self) -> &TailView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TailView {
        &mut self.view
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.as_ref().is_some_and(|w| !w.is_cancelled())
    }
}
