use std::io;
use std::time::{Duration, Instant};

use sg_base::config::constants::EVENT_POLL_MS;

use crate::app::App;
use crate::app::events::handle_event;
use crate::state::VisibilityInput;
use crate::ui;

impl App {
    /// Drive the controller until the window is closed.
    ///
    /// One thread does everything: input, remote calls, file refreshes and
    /// backend reports are each drained in turn, and the frame is redrawn only
    /// when something changed.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            // === INPUT FIRST ===
            let timeout = self.poll_timeout(Instant::now());
            if let Some(evt) = self.window.poll_event(timeout)? {
                match handle_event(&evt, &self.state, self.visibility.state()) {
                    Some(action) => self.apply_action(action),
                    None => self.drive(VisibilityInput::WindowClosedByUser),
                }
                self.state.dirty = true;
            }

            // === REMOTE CALLS ===
            self.process_remote_calls();

            // === FILE TABS ===
            self.process_tail_events();

            // === BACKEND ===
            self.process_backend_events();

            if self.is_quitting() {
                break;
            }

            if self.state.dirty && self.visibility.is_visible() {
                let (state, tails) = (&mut self.state, &mut self.tails);
                self.window.draw(&mut |frame| ui::render(frame, state, tails))?;
                self.state.dirty = false;
            }
        }

        tracing::info!("controller loop finished");
        Ok(())
    }

    /// Wake for the next input poll or the earliest pending file refresh,
    /// whichever comes first.
    pub(crate) fn poll_timeout(&self, now: Instant) -> Duration {
        let poll = Duration::from_millis(EVENT_POLL_MS);
        match self.tails.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(poll),
            None => poll,
        }
    }
}
