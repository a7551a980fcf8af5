//! Exclusive, non-queuing claim of the well-known name.
//!
//! The claim is an advisory `flock` on `<name>.lock`. The kernel drops it when
//! the holder exits, however it exits, so a crashed instance never leaves the
//! name stuck. Only the holder binds `<name>.sock`.
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixListener;
use std::path::Path;

use sg_base::ServiceIdentity;

use crate::BusError;

/// Held name plus the listener bound under it. Dropping releases both.
pub struct NameClaim {
    identity: ServiceIdentity,
    listener: UnixListener,
    _lock: File,
}

pub enum ClaimOutcome {
    Owned(NameClaim),
    /// Another process holds the name.
    Contended,
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> BusError + '_ {
    move |source| BusError::Io { path: path.to_path_buf(), source }
}

/// Try to claim `identity`. Returns immediately whether or not the name is free.
pub fn try_claim(identity: &ServiceIdentity) -> Result<ClaimOutcome, BusError> {
    fs::create_dir_all(identity.scope()).map_err(io_err(identity.scope()))?;

    let lock_path = identity.lock_path();
    let mut lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock_path)
        .map_err(io_err(&lock_path))?;

    // SAFETY: flock only reads the descriptor, which `lock` keeps open for the call.
    let rc = unsafe { libc::flock(lock.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc != 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::WouldBlock {
            tracing::debug!(name = %identity.name, "name already claimed");
            return Ok(ClaimOutcome::Contended);
        }
        return Err(BusError::Io { path: lock_path, source: err });
    }

    // Holder pid, for humans inspecting the runtime dir
    let _ = lock.set_len(0).and_then(|_| writeln!(lock, "{}", std::process::id()));

    let socket_path = identity.socket_path();
    // Any socket file still here belongs to a dead holder
    let _ = fs::remove_file(&socket_path);
    let listener = UnixListener::bind(&socket_path).map_err(io_err(&socket_path))?;

    tracing::info!(name = %identity.name, socket = %socket_path.display(), "name claimed");
    Ok(ClaimOutcome::Owned(NameClaim { identity: identity.clone(), listener, _lock: lock }))
}

impl NameClaim {
    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn listener(&self) -> &UnixListener {
        &self.listener
    }
}

impl Drop for NameClaim {
    fn drop(&mut self) {
        // Remove the socket before the lock goes, so the next holder never
        // races with our cleanup.
        let _ = fs::remove_file(self.identity.socket_path());
    }
}
