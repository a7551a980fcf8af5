use std::path::{Path, PathBuf};

use crate::config::constants::{LOCK_SUFFIX, SERVICE_NAME, SERVICE_PATH, SOCKET_SUFFIX};

/// Identifies the resident instance within one login session.
///
/// `name` is the claimable well-known name, `path` the object path requests
/// address, and `scope` the per-session directory both files live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
    pub path: String,
    pub scope: PathBuf,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, path: impl Into<String>, scope: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into(), scope: scope.into() }
    }

    /// The process-wide identity, scoped to `$XDG_RUNTIME_DIR`.
    pub fn session() -> Self {
        Self::new(SERVICE_NAME, SERVICE_PATH, session_scope())
    }

    pub fn lock_path(&self) -> PathBuf {
        self.scope.join(format!("{}.{}", self.name, LOCK_SUFFIX))
    }

    pub fn socket_path(&self) -> PathBuf {
        self.scope.join(format!("{}.{}", self.name, SOCKET_SUFFIX))
    }

    pub fn scope(&self) -> &Path {
        &self.scope
    }
}

/// Without a runtime dir, fall back to a per-user directory under the temp dir
/// so two users on one host never share a name.
fn session_scope() -> PathBuf {
    dirs::runtime_dir().unwrap_or_else(|| {
        let user = std::env::var("USER").unwrap_or_else(|_| "default".to_string());
        std::env::temp_dir().join(format!("spyglass-{}", user))
    })
}
