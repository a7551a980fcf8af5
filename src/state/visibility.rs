//! Visibility of the main window.
//!
//! A minimized-but-open window is surfaced by a toggle rather than hidden:
//! the host can't reliably tell whether the window has focus at the moment a
//! global shortcut fires, so "visible and minimized" is the only signal that
//! separates "show me the window" from "get it out of the way". How a host
//! reports minimization is environment dependent; see `infra::window`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
    VisibleMinimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityInput {
    /// Remote `show` or the launcher
    ToggleRequested,
    /// Remote `hide`, `doInspect`, or Escape
    HideRequested,
    /// Window manager iconified / restored the window
    MinimizedChanged(bool),
    WindowClosedByUser,
}

/// What the controller must do to the window after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEffect {
    /// Show, grab focus for the command line, refresh backend status once
    ShowAndFocus,
    /// Bring an already shown window to the front
    Present,
    Hide,
    /// Release every file watch, then terminate
    Quit,
}

#[derive(Debug, Default)]
pub struct VisibilityMachine {
    state: Visibility,
}

impl VisibilityMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    /// Answer to the remote `getVisible` query.
    pub fn is_visible(&self) -> bool {
        self.state != Visibility::Hidden
    }

    pub fn apply(&mut self, input: VisibilityInput) -> Option<WindowEffect> {
        use Visibility::*;
        use VisibilityInput::*;

        let (next, effect) = match (self.state, input) {
            (_, WindowClosedByUser) => (self.state, Some(WindowEffect::Quit)),

            (Hidden, ToggleRequested) => (Visible, Some(WindowEffect::ShowAndFocus)),
            (Visible, ToggleRequested) => (Hidden, Some(WindowEffect::Hide)),
            (VisibleMinimized, ToggleRequested) => (Visible, Some(WindowEffect::Present)),

            (Visible | VisibleMinimized, HideRequested) => (Hidden, Some(WindowEffect::Hide)),
            (Hidden, HideRequested) => (Hidden, None),

            (Visible, MinimizedChanged(true)) => (VisibleMinimized, None),
            (VisibleMinimized, MinimizedChanged(false)) => (Visible, None),
            (state, MinimizedChanged(_)) => (state, None),
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, ?input, "visibility transition");
        }
        self.state = next;
        effect
    }
}
