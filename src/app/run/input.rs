use crate::app::App;
use crate::app::actions::Action;
use crate::state::{ResultKind, Tab, VisibilityInput};

impl App {
    pub(crate) fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Hide => self.drive(VisibilityInput::HideRequested),
            Action::Minimized(minimized) => self.drive(VisibilityInput::MinimizedChanged(minimized)),
            Action::Submit => self.submit(),
            Action::HistoryPrev if self.state.is_prompting() => self.cycle_preset(-1),
            Action::HistoryNext if self.state.is_prompting() => self.cycle_preset(1),
            Action::HistoryPrev => {
                if let Some(text) = self.history.navigate_prev(self.state.input.text()) {
                    self.state.input.set(text);
                }
            }
            Action::HistoryNext => {
                if let Some(text) = self.history.navigate_next() {
                    self.state.input.set(text);
                }
            }
            Action::InsertChar(c) => self.state.input.insert(c),
            Action::PasteText(text) => self.state.input.insert_str(&text),
            Action::Backspace => self.state.input.backspace(),
            Action::Delete => self.state.input.delete(),
            Action::CursorLeft => self.state.input.left(),
            Action::CursorRight => self.state.input.right(),
            Action::CursorHome => self.state.input.home(),
            Action::CursorEnd => self.state.input.end(),
            Action::NextTab => self.cycle_tab(1),
            Action::PrevTab => self.cycle_tab(-1),
            Action::OpenWatchPrompt => self.open_watch_prompt(),
            Action::CancelPrompt => self.cancel_watch_prompt(),
            Action::CloseTab => self.close_selected_tab(),
            Action::Inspect => self.do_inspect(),
            Action::FullGc => match self.backend.full_gc() {
                Ok(()) => self.state.push_result(ResultKind::Info, "full garbage collection requested"),
                Err(e) => self.state.push_result(ResultKind::Error, format!("full gc: {}", e)),
            },
            Action::ClearHistory => {
                self.history.clear();
                self.state.push_result(ResultKind::Info, "command history cleared");
            }
            Action::ScrollUp(lines) => self.scroll(lines as isize),
            Action::ScrollDown(lines) => self.scroll(-(lines as isize)),
        }
        self.state.dirty = true;
    }

    /// Enter on the command line: evaluate it, or open the prompted path.
    fn submit(&mut self) {
        if self.state.is_prompting() {
            self.finish_watch_prompt();
            return;
        }
        let text = self.state.input.text().to_string();
        let Some(code) = self.history.submit(&text) else { return };
        self.state.input.take();
        self.state.push_result(ResultKind::Command, code.clone());
        if let Err(e) = self.backend.eval(&code) {
            self.state.push_result(ResultKind::Error, e.to_string());
        }
    }

    /// Results first, then file tabs in the order they were opened.
    pub(crate) fn tab_order(&self) -> Vec<Tab> {
        std::iter::once(Tab::Results).chain(self.tails.ids().into_iter().map(Tab::File)).collect()
    }

    fn cycle_tab(&mut self, step: isize) {
        let tabs = self.tab_order();
        let current = tabs.iter().position(|t| *t == self.state.selected_tab).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(tabs.len() as isize) as usize;
        self.state.selected_tab = tabs[next];
    }

    fn close_selected_tab(&mut self) {
        let Tab::File(id) = self.state.selected_tab else { return };
        let tabs = self.tab_order();
        let position = tabs.iter().position(|t| *t == Tab::File(id)).unwrap_or(0);
        self.tails.close(id);
        self.state.selected_tab = tabs.get(position.saturating_sub(1)).copied().unwrap_or(Tab::Results);
    }

    /// Positive `lines` scrolls towards older output.
    fn scroll(&mut self, lines: isize) {
        match self.state.selected_tab {
            Tab::Results => {
                let max = self.state.results.len();
                self.state.results_scroll = self.state.results_scroll.saturating_add_signed(lines).min(max);
            }
            Tab::File(id) => {
                if let Some(session) = self.tails.get_mut(id) {
                    let view = session.view_mut();
                    if lines >= 0 {
                        view.scroll_up(lines as usize);
                    } else {
                        view.scroll_down(lines.unsigned_abs());
                    }
                }
            }
        }
    }
}
