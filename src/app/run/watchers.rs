use std::time::Instant;

use sg_base::config::expand_home;
use sg_mod_tail::TailId;

use crate::app::App;
use crate::infra::backend::BackendEvent;
use crate::state::{InputMode, ResultKind, Tab};

impl App {
    /// Arm refreshes for changed files and run those whose window elapsed.
    pub(crate) fn process_tail_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.tail_rx.try_recv() {
            self.tails.notify(event, now);
        }
        if !self.tails.fire_due(now).is_empty() {
            self.state.dirty = true;
        }
    }

    pub(crate) fn process_backend_events(&mut self) {
        while let Ok(event) = self.backend_rx.try_recv() {
            match event {
                BackendEvent::StatusChanged { healthy } => {
                    if self.state.backend_healthy != Some(healthy) {
                        tracing::info!(healthy, "backend status changed");
                    }
                    self.state.backend_healthy = Some(healthy);
                    self.state.dirty = true;
                }
            }
        }
    }

    /// Swap the command line for a path prompt, pre-filled with the first preset.
    pub(crate) fn open_watch_prompt(&mut self) {
        if self.state.is_prompting() {
            return;
        }
        let stashed = self.state.input.take();
        if let Some(preset) = self.config.watch_presets.first() {
            self.state.input.set(preset.path.clone());
        }
        self.state.input_mode = InputMode::WatchPath { stashed, preset: 0 };
    }

    pub(crate) fn cycle_preset(&mut self, step: isize) {
        let count = self.config.watch_presets.len();
        let InputMode::WatchPath { preset, .. } = &mut self.state.input_mode else { return };
        if count == 0 {
            return;
        }
        *preset = (*preset as isize + step).rem_euclid(count as isize) as usize;
        let path = self.config.watch_presets[*preset].path.clone();
        self.state.input.set(path);
    }

    /// Leave the prompt and put the stashed command line back.
    pub(crate) fn cancel_watch_prompt(&mut self) {
        if let InputMode::WatchPath { stashed, .. } = std::mem::replace(&mut self.state.input_mode, InputMode::Command) {
            self.state.input.set(stashed);
        }
    }

    pub(crate) fn finish_watch_prompt(&mut self) {
        let text = self.state.input.text().trim().to_string();
        self.cancel_watch_prompt();
        if !text.is_empty() {
            self.open_watch(&text);
        }
    }

    /// Open a file tab for `text` (a path, `~` allowed) and select it.
    ///
    /// Tabs opened from a preset carry the preset's name, others the file
    /// name. A rejected path is reported in the Results tab.
    pub fn open_watch(&mut self, text: &str) -> Option<TailId> {
        let path = expand_home(text);
        let label = self
            .config
            .watch_presets
            .iter()
            .find(|p| p.path == text)
            .map(|p| p.name.clone())
            .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| text.to_string());

        match self.tails.open(label, &path) {
            Ok(id) => {
                self.state.selected_tab = Tab::File(id);
                self.state.push_result(ResultKind::Info, format!("watching {}", path.display()));
                Some(id)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "file watch rejected");
                self.state.selected_tab = Tab::Results;
                self.state.push_result(ResultKind::Error, e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::Action;
    use crate::app::run::testing::{test_app, test_app_with};
    use sg_base::config::{AppConfig, WatchPreset};
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn prompt_stashes_and_restores_command_line() {
        let (mut app, _h) = test_app();
        app.state.input.set("half typed");
        app.apply_action(Action::OpenWatchPrompt);
        assert!(app.state.is_prompting());
        assert_eq!(app.state.input.text(), "~/.xsession-errors");

        app.apply_action(Action::CancelPrompt);
        assert!(!app.state.is_prompting());
        assert_eq!(app.state.input.text(), "half typed");
    }

    #[test]
    fn presets_cycle_and_name_the_tab() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("one.log");
        let second = dir.path().join("two.log");
        std::fs::write(&first, "1").unwrap();
        std::fs::write(&second, "2").unwrap();
        let config = AppConfig {
            watch_presets: vec![
                WatchPreset { name: "First".into(), path: first.display().to_string() },
                WatchPreset { name: "Second".into(), path: second.display().to_string() },
            ],
            ..AppConfig::default()
        };
        let (mut app, _h) = test_app_with(config, true);

        app.apply_action(Action::OpenWatchPrompt);
        app.apply_action(Action::HistoryNext);
        assert_eq!(app.state.input.text(), second.display().to_string());
        app.apply_action(Action::HistoryNext);
        assert_eq!(app.state.input.text(), first.display().to_string());
        app.apply_action(Action::HistoryPrev);
        app.apply_action(Action::Submit);

        let Tab::File(id) = app.state.selected_tab else { panic!("file tab not selected") };
        let session = app.tails.get(id).unwrap();
        assert_eq!(session.label(), "Second");
        assert_eq!(session.view().text(), "2");
        assert!(app.history.entries().is_empty());
    }

    #[test]
    fn typed_path_is_labelled_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.txt");
        std::fs::write(&path, "hello").unwrap();
        let (mut app, _h) = test_app();

        let id = app.open_watch(&path.display().to_string()).unwrap();
        assert_eq!(app.tails.get(id).unwrap().label(), "custom.txt");
        assert_eq!(app.state.selected_tab, Tab::File(id));
    }

    #[test]
    fn rejected_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _h) = test_app();
        assert!(app.open_watch(&dir.path().display().to_string()).is_none());
        assert!(app.open_watch("/definitely/not/here.log").is_none());
        assert!(app.tails.is_empty());
        assert_eq!(app.state.selected_tab, Tab::Results);
        assert_eq!(app.state.results.iter().filter(|r| r.kind == ResultKind::Error).count(), 2);
    }

    #[test]
    fn appended_file_is_re_rendered_once_window_elapses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grow.log");
        std::fs::write(&path, "one\n").unwrap();
        let (mut app, _h) = test_app();
        let id = app.open_watch(&path.display().to_string()).unwrap();

        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "two").unwrap();
        drop(f);

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.tails.get(id).unwrap().view().text() != "one\ntwo\n" && Instant::now() < deadline {
            app.process_tail_events();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(app.tails.get(id).unwrap().view().text(), "one\ntwo\n");
    }

    #[test]
    fn status_reports_drive_the_label() {
        let (mut app, h) = test_app();
        h.backend_tx.send(BackendEvent::StatusChanged { healthy: false }).unwrap();
        app.process_backend_events();
        assert!(app.state.show_status_label());
        h.backend_tx.send(BackendEvent::StatusChanged { healthy: true }).unwrap();
        app.process_backend_events();
        assert!(!app.state.show_status_label());
    }
}
