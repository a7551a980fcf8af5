//! Fakes for driving an [`App`] without a terminal or a backend.
use std::io;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;
use sg_base::config::AppConfig;
use sg_base::settings::MemorySettings;
use sg_mod_bus::IncomingCall;

use crate::app::App;
use crate::infra::backend::{BackendError, BackendEvent, EvalBackend};
use crate::infra::window::WindowSurface;

pub(crate) type Log = Arc<Mutex<Vec<String>>>;

pub(crate) struct Handles {
    /// Window operations in call order: "show", "present", "hide"
    pub window_log: Log,
    /// Events handed out by `poll_event`, front first
    pub window_script: Arc<Mutex<Vec<Event>>>,
    /// Backend requests in call order
    pub backend_log: Log,
    pub backend_tx: Sender<BackendEvent>,
    pub calls_tx: Sender<IncomingCall>,
}

struct ScriptedWindow {
    log: Log,
    script: Arc<Mutex<Vec<Event>>>,
}

impl WindowSurface for ScriptedWindow {
    fn show(&mut self) -> io::Result<()> {
        self.log.lock().unwrap().push("show".into());
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.log.lock().unwrap().push("present".into());
        Ok(())
    }

    fn hide(&mut self) -> io::Result<()> {
        self.log.lock().unwrap().push("hide".into());
        Ok(())
    }

    fn poll_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
        let mut script = self.script.lock().unwrap();
        Ok(if script.is_empty() { None } else { Some(script.remove(0)) })
    }

    fn draw(&mut self, _render: &mut dyn FnMut(&mut Frame<'_>)) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) struct RecordingBackend {
    log: Log,
    healthy: bool,
    events_tx: Sender<BackendEvent>,
}

impl EvalBackend for RecordingBackend {
    fn eval(&mut self, code: &str) -> Result<(), BackendError> {
        self.log.lock().unwrap().push(format!("eval {}", code));
        Ok(())
    }

    fn full_gc(&mut self) -> Result<(), BackendError> {
        self.log.lock().unwrap().push("gc".into());
        Ok(())
    }

    fn start_inspector(&mut self) -> Result<(), BackendError> {
        self.log.lock().unwrap().push("inspect".into());
        if self.healthy { Ok(()) } else { Err(BackendError::Offline) }
    }

    fn refresh_status(&mut self) {
        self.log.lock().unwrap().push("status".into());
        let _ = self.events_tx.send(BackendEvent::StatusChanged { healthy: self.healthy });
    }
}

pub(crate) fn test_app() -> (App, Handles) {
    test_app_with(AppConfig::default(), true)
}

pub(crate) fn test_app_with(config: AppConfig, healthy: bool) -> (App, Handles) {
    let window_log = Log::default();
    let window_script = Arc::new(Mutex::new(Vec::new()));
    let backend_log = Log::default();
    let (backend_tx, backend_rx) = mpsc::channel();
    let (calls_tx, calls_rx) = mpsc::channel();

    let window = ScriptedWindow { log: window_log.clone(), script: window_script.clone() };
    let backend = RecordingBackend { log: backend_log.clone(), healthy, events_tx: backend_tx.clone() };
    let app = App::new(
        config,
        Box::new(window),
        Box::new(backend),
        backend_rx,
        Box::new(MemorySettings::default()),
        calls_rx,
    );
    (app, Handles { window_log, window_script, backend_log, backend_tx, calls_tx })
}

pub(crate) fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}
