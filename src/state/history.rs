//! Command history with shell-style Up/Down navigation.
//!
//! Stepping back from the live line remembers what was typed (the draft) so
//! stepping forward past the newest entry gives it back untouched. Every
//! successful submit is persisted; storage failures never reach the user.
use sg_base::config::constants::HISTORY_KEY;
use sg_base::settings::SettingsStore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Editing,
    Browsing { index: usize, draft: String },
}

pub struct CommandHistory {
    entries: Vec<String>,
    mode: Mode,
    store: Box<dyn SettingsStore>,
}

impl CommandHistory {
    /// Read persisted entries. An unreadable store starts an empty history.
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let entries = match store.get_strv(HISTORY_KEY) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "command history unavailable, starting empty");
                Vec::new()
            }
        };
        Self { entries, mode: Mode::Editing, store }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Index of the entry on display, `None` while editing the live line.
    pub fn cursor(&self) -> Option<usize> {
        match &self.mode {
            Mode::Editing => None,
            Mode::Browsing { index, .. } => Some(*index),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.mode {
            Mode::Editing => None,
            Mode::Browsing { draft, .. } => Some(draft),
        }
    }

    /// Record a command line. Returns the text to evaluate, `None` for an
    /// empty line (which leaves everything untouched).
    pub fn submit(&mut self, text: &str) -> Option<String> {
        if text.is_empty() {
            return None;
        }
        if self.entries.last().map(String::as_str) != Some(text) {
            self.entries.push(text.to_string());
        }
        self.mode = Mode::Editing;
        self.persist();
        Some(text.to_string())
    }

    /// Step to the previous (older) entry. `current_text` is the line as
    /// typed; it becomes the draft when navigation starts here.
    pub fn navigate_prev(&mut self, current_text: &str) -> Option<String> {
        let index = match &mut self.mode {
            Mode::Editing => {
                let index = self.entries.len().checked_sub(1)?;
                self.mode = Mode::Browsing { index, draft: current_text.to_string() };
                index
            }
            Mode::Browsing { index: 0, .. } => return None,
            Mode::Browsing { index, .. } => {
                *index -= 1;
                *index
            }
        };
        self.entries.get(index).cloned()
    }

    /// Step to the next (newer) entry; past the newest the draft comes back
    /// and navigation ends.
    pub fn navigate_next(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.mode, Mode::Editing) {
            Mode::Editing => None,
            Mode::Browsing { index, draft } if index + 1 >= self.entries.len() => Some(draft),
            Mode::Browsing { index, draft } => {
                let index = index + 1;
                self.mode = Mode::Browsing { index, draft };
                self.entries.get(index).cloned()
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.mode = Mode::Editing;
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.set_strv(HISTORY_KEY, &self.entries) {
            tracing::warn!(error = %e, "failed to persist command history");
        }
    }
}
