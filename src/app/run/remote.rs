use std::time::Instant;

use sg_mod_bus::{RemoteCall, Response};

use crate::app::{App, LaunchMode};
use crate::state::{InputMode, ResultKind, VisibilityInput, WindowEffect};

impl App {
    /// Answer every call the bus server forwarded since the last tick.
    /// Calls whose caller already gave up are dropped unrun.
    pub(crate) fn process_remote_calls(&mut self) {
        while let Ok(incoming) = self.calls_rx.try_recv() {
            if incoming.is_expired(Instant::now()) {
                tracing::warn!(method = incoming.call.method(), "dropping remote call that outlived its caller");
                continue;
            }
            let response = self.handle_remote_call(incoming.call);
            incoming.reply(response);
        }
    }

    pub(crate) fn handle_remote_call(&mut self, call: RemoteCall) -> Response {
        tracing::debug!(method = call.method(), "remote call");
        match call {
            RemoteCall::Show => self.drive(VisibilityInput::ToggleRequested),
            RemoteCall::Hide => self.drive(VisibilityInput::HideRequested),
            RemoteCall::GetVisible => return Response::ok_visible(self.visibility.is_visible()),
            RemoteCall::DoInspect => self.do_inspect(),
        }
        Response::ok()
    }

    /// Act on this process's own launch once the name is ours.
    pub fn apply_launch(&mut self, mode: Option<LaunchMode>) {
        match mode {
            None => self.drive(VisibilityInput::ToggleRequested),
            Some(LaunchMode::Inspect) => self.do_inspect(),
            Some(LaunchMode::Daemon) => tracing::info!("resident in the background"),
        }
    }

    /// Start the picker, then hide whether or not it started.
    pub(crate) fn do_inspect(&mut self) {
        if let Err(e) = self.backend.start_inspector() {
            tracing::warn!(error = %e, "inspector failed to start");
            self.state.push_result(ResultKind::Error, format!("inspector: {}", e));
        }
        self.drive(VisibilityInput::HideRequested);
    }

    pub(crate) fn drive(&mut self, input: VisibilityInput) {
        if let Some(effect) = self.visibility.apply(input) {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: WindowEffect) {
        let result = match effect {
            WindowEffect::ShowAndFocus => {
                if self.state.input_mode != InputMode::Command {
                    self.cancel_watch_prompt();
                }
                self.backend.refresh_status();
                self.window.show()
            }
            WindowEffect::Present => self.window.present(),
            WindowEffect::Hide => self.window.hide(),
            WindowEffect::Quit => {
                self.tails.close_all();
                self.quit = true;
                Ok(())
            }
        };
        if let Err(e) = result {
            tracing::error!(?effect, error = %e, "window operation failed");
        }
        self.state.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::run::testing::{entries, test_app, test_app_with};
    use crate::state::Visibility;
    use sg_base::config::AppConfig;
    use sg_mod_bus::IncomingCall;
    use std::sync::mpsc;
    use std::time::Duration;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    #[test]
    fn show_toggles_and_get_visible_follows() {
        let (mut app, h) = test_app();
        assert_eq!(app.handle_remote_call(RemoteCall::GetVisible).visible, Some(false));

        assert!(app.handle_remote_call(RemoteCall::Show).ok);
        assert_eq!(app.visibility.state(), Visibility::Visible);
        assert_eq!(app.handle_remote_call(RemoteCall::GetVisible).visible, Some(true));

        app.handle_remote_call(RemoteCall::Show);
        assert_eq!(app.visibility.state(), Visibility::Hidden);
        assert_eq!(entries(&h.window_log), ["show", "hide"]);
    }

    #[test]
    fn showing_refreshes_backend_status_once() {
        let (mut app, h) = test_app();
        app.handle_remote_call(RemoteCall::Show);
        app.handle_remote_call(RemoteCall::Hide);
        app.handle_remote_call(RemoteCall::Hide);
        assert_eq!(entries(&h.backend_log), ["status"]);
    }

    #[test]
    fn minimized_window_is_presented_not_hidden() {
        let (mut app, h) = test_app();
        app.handle_remote_call(RemoteCall::Show);
        app.drive(VisibilityInput::MinimizedChanged(true));
        assert_eq!(app.handle_remote_call(RemoteCall::GetVisible).visible, Some(true));

        app.handle_remote_call(RemoteCall::Show);
        assert_eq!(app.visibility.state(), Visibility::Visible);
        assert_eq!(entries(&h.window_log), ["show", "present"]);
    }

    #[test]
    fn do_inspect_starts_picker_and_hides() {
        let (mut app, h) = test_app();
        app.handle_remote_call(RemoteCall::Show);
        assert!(app.handle_remote_call(RemoteCall::DoInspect).ok);
        assert_eq!(app.visibility.state(), Visibility::Hidden);
        assert!(entries(&h.backend_log).contains(&"inspect".to_string()));
    }

    #[test]
    fn do_inspect_hides_even_when_picker_fails() {
        let (mut app, _h) = test_app_with(AppConfig::default(), false);
        app.handle_remote_call(RemoteCall::Show);
        assert!(app.handle_remote_call(RemoteCall::DoInspect).ok);
        assert_eq!(app.visibility.state(), Visibility::Hidden);
        assert!(app.state.results.iter().any(|r| r.kind == ResultKind::Error));
    }

    #[test]
    fn launch_modes() {
        let (mut app, h) = test_app();
        app.apply_launch(Some(LaunchMode::Daemon));
        assert_eq!(app.visibility.state(), Visibility::Hidden);
        assert!(entries(&h.window_log).is_empty());

        app.apply_launch(None);
        assert_eq!(app.visibility.state(), Visibility::Visible);

        app.apply_launch(Some(LaunchMode::Inspect));
        assert_eq!(app.visibility.state(), Visibility::Hidden);
    }

    #[test]
    fn queued_calls_are_answered_in_order() {
        let (mut app, h) = test_app();
        let mut replies = Vec::new();
        for call in [RemoteCall::Show, RemoteCall::GetVisible, RemoteCall::Hide, RemoteCall::GetVisible] {
            let (reply_tx, reply_rx) = mpsc::channel();
            h.calls_tx.send(IncomingCall::new(call, reply_tx, far_deadline())).unwrap();
            replies.push(reply_rx);
        }
        app.process_remote_calls();
        let visible: Vec<Option<bool>> = replies.iter().map(|rx| rx.try_recv().unwrap().visible).collect();
        assert_eq!(visible, [None, Some(true), None, Some(false)]);
    }

    #[test]
    fn expired_calls_are_dropped_without_running() {
        let (mut app, h) = test_app();
        let (reply_tx, reply_rx) = mpsc::channel();
        let stale = Instant::now() - Duration::from_millis(1);
        h.calls_tx.send(IncomingCall::new(RemoteCall::Show, reply_tx, stale)).unwrap();
        let (live_tx, live_rx) = mpsc::channel();
        h.calls_tx.send(IncomingCall::new(RemoteCall::GetVisible, live_tx, far_deadline())).unwrap();

        app.process_remote_calls();
        assert_eq!(app.visibility.state(), Visibility::Hidden);
        assert!(entries(&h.window_log).is_empty());
        assert!(reply_rx.try_recv().is_err());
        assert_eq!(live_rx.try_recv().unwrap().visible, Some(false));
    }

    #[test]
    fn close_releases_tabs_and_quits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.log");
        std::fs::write(&path, "x").unwrap();
        let (mut app, _h) = test_app();
        app.tails.open("a", &path).unwrap();

        app.drive(VisibilityInput::WindowClosedByUser);
        assert!(app.is_quitting());
        assert!(app.tails.is_empty());
    }
}
