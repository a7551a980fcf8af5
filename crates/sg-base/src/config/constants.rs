// =============================================================================
// SESSION SERVICE
// =============================================================================

/// Well-known name claimed by the resident instance
pub const SERVICE_NAME: &str = "org.spyglass.Controller";

/// Object path every remote request must address
pub const SERVICE_PATH: &str = "/org/spyglass/Controller";

/// Suffix of the advisory lock file that backs the name claim
pub const LOCK_SUFFIX: &str = "lock";

/// Suffix of the Unix socket the resident instance listens on
pub const SOCKET_SUFFIX: &str = "sock";

/// Default timeout for one remote call round trip (client and server side)
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 5_000;

/// Shortest remote call timeout a config may ask for
pub const MIN_RPC_TIMEOUT_MS: u64 = 100;

// =============================================================================
// FILE TAILING
// =============================================================================

/// Coalescing window for file change notifications (2 refreshes per second max)
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Floor for a configured coalescing window; anything shorter breaks the 2 Hz bound
pub const MIN_DEBOUNCE_MS: u64 = 500;

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Directory name under the platform config/state dirs
pub const APP_DIR: &str = "spyglass";

/// YAML configuration file name
pub const CONFIG_FILE: &str = "config.yaml";

/// JSON settings store file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings key holding the command history string list
pub const HISTORY_KEY: &str = "command-history";

/// Log file name under the state dir
pub const LOG_FILE: &str = "spyglass.log";

/// Environment variable overriding the configured log filter
pub const LOG_ENV: &str = "SPYGLASS_LOG";

// =============================================================================
// EVENT LOOP
// =============================================================================

/// Upper bound on how long the loop waits for input before draining channels
pub const EVENT_POLL_MS: u64 = 50;
