/// Everything a key press can ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Escape: hide the window (or leave the path prompt)
    Hide,
    Submit,
    HistoryPrev,
    HistoryNext,
    InsertChar(char),
    PasteText(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    NextTab,
    PrevTab,
    OpenWatchPrompt,
    CancelPrompt,
    CloseTab,
    /// Start the element picker and get out of its way
    Inspect,
    FullGc,
    ClearHistory,
    ScrollUp(usize),
    ScrollDown(usize),
    Minimized(bool),
}
