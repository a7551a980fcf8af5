use std::sync::mpsc::{self, Receiver};

use sg_base::config::AppConfig;
use sg_base::settings::SettingsStore;
use sg_mod_bus::IncomingCall;
use sg_mod_tail::{TailEvent, TailSet};

use crate::infra::backend::{BackendEvent, EvalBackend};
use crate::infra::window::WindowSurface;
use crate::state::{CommandHistory, State, VisibilityMachine};

pub struct App {
    pub state: State,
    pub(crate) config: AppConfig,
    pub(crate) visibility: VisibilityMachine,
    pub(crate) history: CommandHistory,
    /// Open file tabs and their pending refreshes
    pub(crate) tails: TailSet,
    pub(crate) backend: Box<dyn EvalBackend>,
    pub(crate) window: Box<dyn WindowSurface>,
    /// Calls forwarded by the bus server, answered one at a time
    pub(crate) calls_rx: Receiver<IncomingCall>,
    pub(crate) tail_rx: Receiver<TailEvent>,
    pub(crate) backend_rx: Receiver<BackendEvent>,
    /// Set once the window is closed; the loop exits at the end of the tick
    pub(crate) quit: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        window: Box<dyn WindowSurface>,
        backend: Box<dyn EvalBackend>,
        backend_rx: Receiver<BackendEvent>,
        settings: Box<dyn SettingsStore>,
        calls_rx: Receiver<IncomingCall>,
    ) -> Self {
        let (tail_tx, tail_rx) = mpsc::channel();
        let tails = TailSet::new(config.debounce(), tail_tx);
        Self {
            state: State::new(),
            visibility: VisibilityMachine::new(),
            history: CommandHistory::load(settings),
            tails,
            backend,
            window,
            calls_rx,
            tail_rx,
            backend_rx,
            quit: false,
            config,
        }
    }

    pub fn is_quitting(&self) -> bool {
        self.quit
    }
}
