pub mod history;
pub mod input;
pub mod visibility;

use chrono::{DateTime, Local};
use sg_mod_tail::TailId;

pub use history::CommandHistory;
pub use input::InputLine;
pub use visibility::{Visibility, VisibilityInput, VisibilityMachine, WindowEffect};

/// Keep the Results log bounded; older lines are dropped first.
pub const MAX_RESULTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Results,
    File(TailId),
}

/// What the command line is currently collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Command,
    /// Path prompt for a new file tab. `stashed` is the command line that was
    /// on screen when the prompt opened.
    WatchPath { stashed: String, preset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Command,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub at: DateTime<Local>,
    pub kind: ResultKind,
    pub text: String,
}

/// View state of the controller window.
pub struct State {
    pub input: InputLine,
    pub input_mode: InputMode,
    pub selected_tab: Tab,
    pub results: Vec<ResultEntry>,
    /// Lines scrolled up from the bottom of the Results tab
    pub results_scroll: usize,
    /// Last reported backend health; `None` until the first status refresh
    pub backend_healthy: Option<bool>,
    pub dirty: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self {
            input: InputLine::default(),
            input_mode: InputMode::Command,
            selected_tab: Tab::Results,
            results: Vec::new(),
            results_scroll: 0,
            backend_healthy: None,
            dirty: true,
        }
    }

    pub fn push_result(&mut self, kind: ResultKind, text: impl Into<String>) {
        self.results.push(ResultEntry { at: Local::now(), kind, text: text.into() });
        if self.results.len() > MAX_RESULTS {
            let excess = self.results.len() - MAX_RESULTS;
            self.results.drain(..excess);
        }
        self.results_scroll = 0;
        self.dirty = true;
    }

    /// The "backend unavailable" label is up only after a refresh said so.
    pub fn show_status_label(&self) -> bool {
        self.backend_healthy == Some(false)
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self.input_mode, InputMode::WatchPath { .. })
    }
}
