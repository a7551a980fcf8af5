pub mod actions;
mod app;
pub mod events;
mod run;

pub use app::App;

/// How this launch was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LaunchMode {
    /// Start the element picker instead of showing the window
    Inspect,
    /// Stay resident and hidden until someone asks for the window
    Daemon,
}
