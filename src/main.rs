mod app;
mod infra;
mod state;
mod ui;

use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use sg_base::ServiceIdentity;
use sg_base::config::{AppConfig, load_config};
use sg_base::settings::JsonSettings;
use sg_mod_bus::{Arbitration, BusServer, NameClaim, RemoteHandle, arbitrate};

use app::{App, LaunchMode};
use infra::backend::OfflineBackend;

/// Toggle the debugger controller window, starting it if nobody owns it yet.
#[derive(Parser, Debug)]
#[command(name = "spyglass", version, about)]
struct Cli {
    /// `inspect` starts the element picker, `daemon` stays resident and hidden
    #[arg(value_enum)]
    mode: Option<LaunchMode>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let _log_guard = infra::logging::init(&config);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "using default configuration");
        eprintln!("spyglass: {}; using defaults", e);
    }

    let identity = ServiceIdentity::session();
    match arbitrate(&identity, config.rpc_timeout()) {
        Ok(Arbitration::Server(claim)) => run_resident(claim, cli.mode, config),
        Ok(Arbitration::Client(handle)) => forward(handle, cli.mode),
        Err(e) => {
            tracing::error!(error = %e, name = %identity.name, "neither owner nor client");
            eprintln!("spyglass: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Another process owns the controller: pass the launch on and exit.
fn forward(mut handle: RemoteHandle, mode: Option<LaunchMode>) -> ExitCode {
    let result = match mode {
        None => handle.show(),
        Some(LaunchMode::Inspect) => handle.do_inspect(),
        Some(LaunchMode::Daemon) => {
            tracing::info!("controller already resident");
            Ok(())
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "remote call failed");
            eprintln!("spyglass: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_resident(claim: NameClaim, mode: Option<LaunchMode>, config: AppConfig) -> ExitCode {
    let (calls_tx, calls_rx) = mpsc::channel();
    let server = match BusServer::start(claim, calls_tx, config.rpc_timeout()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start bus server");
            eprintln!("spyglass: cannot serve remote calls: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(socket = %server.claim().identity().socket_path().display(), "controller resident");

    infra::logging::install_panic_hook();
    let window = infra::window::open_window();
    let (backend_tx, backend_rx) = mpsc::channel();
    let backend = OfflineBackend::new(backend_tx);
    let settings = JsonSettings::open_default();

    let mut app = App::new(config, window, Box::new(backend), backend_rx, Box::new(settings), calls_rx);
    app.apply_launch(mode);
    let result = app.run();

    // Restore the terminal before anything is printed.
    drop(app);
    drop(server);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "controller loop failed");
            eprintln!("spyglass: {}", e);
            ExitCode::FAILURE
        }
    }
}
