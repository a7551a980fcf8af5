//! File logging. The UI owns the terminal, so nothing may log to stdout.
use std::sync::Once;

use sg_base::config::constants::{LOG_ENV, LOG_FILE};
use sg_base::config::{AppConfig, state_dir};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `<state dir>/spyglass/spyglass.log`.
///
/// The filter comes from `SPYGLASS_LOG`, then the config's `log_filter`.
/// Returns the writer guard, which must outlive the program's last log line;
/// `None` means logging is off (unwritable directory or a subscriber already set).
pub fn init(config: &AppConfig) -> Option<WorkerGuard> {
    let log_dir = state_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("spyglass: logging disabled, cannot create {}: {}", log_dir.display(), e);
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("spyglass: logging disabled: {}", e);
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).try_init() {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

/// Panic hook: give the terminal back, record the panic, then run the default hook.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            super::window::restore_terminal();
            let backtrace = std::backtrace::Backtrace::force_capture();
            tracing::error!(target: "spyglass::panic", %info, %backtrace, "panic");
            default_hook(info);
        }));
    });
}
