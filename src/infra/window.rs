//! Where the controller draws.
//!
//! A terminal has no window manager to ask, so the mapping is:
//! show/hide swap the alternate screen in and out, present asks the emulator
//! to de-iconify and raise (xterm window ops, ignored where unsupported), and
//! focus-change reports stand in for minimize notifications. Without a tty the
//! controller runs headless, answering remote calls with nothing on screen.
//!
//! Focus is a weak signal. It drops whenever the user clicks into another
//! window, and a global shortcut can steal it for a moment while it fires.
//! So a window that merely lost focus counts as minimized, and the next toggle
//! raises it instead of hiding it. The cost is one extra toggle to hide a
//! window that was on screen but unfocused. Terminals that never send focus
//! reports stay in the plain visible state and toggle straight to hidden.
use std::io::{self, IsTerminal, Stdout, Write};
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange, Event,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;

/// xterm: de-iconify, then raise to the front of the stacking order.
const RAISE_WINDOW: &str = "\x1b[1t\x1b[5t";

const HIDDEN_BANNER: &str = "spyglass is running hidden. Run `spyglass` to show it, Ctrl+C to quit.\r\n";

pub trait WindowSurface {
    fn show(&mut self) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
    fn hide(&mut self) -> io::Result<()>;
    /// Wait up to `timeout` for one input event.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
    /// Draw a frame; surfaces that are not shown skip it.
    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame<'_>)) -> io::Result<()>;
}

/// Pick the terminal when there is one, headless otherwise.
pub fn open_window() -> Box<dyn WindowSurface> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        match TerminalWindow::open() {
            Ok(window) => return Box::new(window),
            Err(e) => {
                restore_terminal();
                tracing::warn!(error = %e, "terminal unavailable, running headless");
            }
        }
    }
    Box::new(HeadlessWindow::default())
}

/// Best-effort terminal reset, also used by the panic hook.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableBracketedPaste, DisableFocusChange, LeaveAlternateScreen);
    let _ = execute!(io::stdout(), crossterm::cursor::Show);
}

pub struct TerminalWindow {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    shown: bool,
}

impl TerminalWindow {
    pub fn open() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnableBracketedPaste, EnableFocusChange)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let mut window = Self { terminal, shown: false };
        window.print_banner()?;
        Ok(window)
    }

    fn print_banner(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(HIDDEN_BANNER.as_bytes())?;
        out.flush()
    }
}

impl WindowSurface for TerminalWindow {
    fn show(&mut self) -> io::Result<()> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.terminal.clear()?;
        self.shown = true;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(RAISE_WINDOW.as_bytes())?;
        out.flush()?;
        self.terminal.clear()
    }

    fn hide(&mut self) -> io::Result<()> {
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.shown = false;
        self.print_banner()
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? { Ok(Some(event::read()?)) } else { Ok(None) }
    }

    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame<'_>)) -> io::Result<()> {
        if self.shown {
            self.terminal.draw(|frame| render(frame))?;
        }
        Ok(())
    }
}

impl Drop for TerminalWindow {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// No tty: visibility is tracked but nothing is drawn and no input arrives.
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    shown: bool,
}

impl WindowSurface for HeadlessWindow {
    fn show(&mut self) -> io::Result<()> {
        self.shown = true;
        tracing::debug!(shown = self.shown, "headless window");
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn hide(&mut self) -> io::Result<()> {
        self.shown = false;
        tracing::debug!(shown = self.shown, "headless window");
        Ok(())
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        thread::sleep(timeout);
        Ok(None)
    }

    fn draw(&mut self, _render: &mut dyn FnMut(&mut Frame<'_>)) -> io::Result<()> {
        Ok(())
    }
}
