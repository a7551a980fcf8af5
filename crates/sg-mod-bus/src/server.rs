//! Resident side of the bus.
//!
//! One accept thread, one thread per connection. Connection threads never
//! touch controller state: each decoded call is handed to the event loop as an
//! [`IncomingCall`] carrying a one-shot reply channel, and the thread waits for
//! the loop's answer.
use std::io::{BufReader, BufWriter};
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::claim::NameClaim;
use crate::protocol::{ReadError, RemoteCall, Request, Response, read_message, write_message};

/// A call waiting for the event loop.
pub struct IncomingCall {
    pub call: RemoteCall,
    reply: Sender<Response>,
    /// After this the caller has been told the call failed
    deadline: Instant,
}

impl IncomingCall {
    pub fn new(call: RemoteCall, reply: Sender<Response>, deadline: Instant) -> Self {
        Self { call, reply, deadline }
    }

    /// An expired call must not be run: its client already gave up and
    /// reported a failure.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn reply(self, response: Response) {
        // The connection may have timed out and gone; nothing to do then
        let _ = self.reply.send(response);
    }
}

pub struct BusServer {
    claim: NameClaim,
    shutdown: Arc<AtomicBool>,
    accept_handle: Option<JoinHandle<()>>,
}

impl BusServer {
    /// Start serving on a claimed name. Calls are forwarded on `calls_tx`.
    /// `reply_timeout` must be non-zero; it bounds both idle connections and
    /// the wait for the loop's answer.
    pub fn start(claim: NameClaim, calls_tx: Sender<IncomingCall>, reply_timeout: Duration) -> std::io::Result<Self> {
        if reply_timeout.is_zero() {
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "reply timeout must be non-zero"));
        }
        let listener = claim.listener().try_clone()?;
        let object_path = claim.identity().path.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);

        let accept_handle = thread::Builder::new()
            .name("bus-accept".to_string())
            .spawn(move || accept_loop(listener, object_path, calls_tx, reply_timeout, stop))?;

        Ok(Self { claim, shutdown, accept_handle: Some(accept_handle) })
    }

    pub fn claim(&self) -> &NameClaim {
        &self.claim
    }
}

impl Drop for BusServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        // Wake the blocking accept() so the thread sees the flag
        let _ = UnixStream::connect(self.claim.identity().socket_path());
        if let Some(handle) = self.accept_handle.take() {
            let _ = handle.join();
        }
    }
}

fn accept_loop(
    listener: UnixListener,
    object_path: String,
    calls_tx: Sender<IncomingCall>,
    reply_timeout: Duration,
    stop: Arc<AtomicBool>,
) {
    for stream in listener.incoming() {
        if stop.load(Ordering::Acquire) {
            break;
        }
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };
        let calls_tx = calls_tx.clone();
        let object_path = object_path.clone();
        let spawned = thread::Builder::new()
            .name("bus-conn".to_string())
            .spawn(move || handle_connection(stream, &object_path, &calls_tx, reply_timeout));
        if let Err(e) = spawned {
            tracing::error!(error = %e, "cannot spawn connection thread");
        }
    }
    tracing::debug!("accept loop stopped");
}

fn handle_connection(stream: UnixStream, object_path: &str, calls_tx: &Sender<IncomingCall>, reply_timeout: Duration) {
    // Idle clients must not pin a thread forever
    if let Err(e) = stream.set_read_timeout(Some(reply_timeout)) {
        tracing::warn!(error = %e, "cannot set connection timeout, dropping connection");
        return;
    }
    let read_half = match stream.try_clone() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "cannot clone connection");
            return;
        }
    };
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(stream);

    loop {
        let response = match read_message::<_, Request>(&mut reader) {
            Ok(None) => break,
            Ok(Some(req)) => dispatch(req, object_path, calls_tx, reply_timeout),
            Err(ReadError::Decode(e)) => Response::err(format!("invalid request: {}", e)),
            Err(ReadError::Io(_)) => break,
        };
        if write_message(&mut writer, &response).is_err() {
            break;
        }
    }
}

fn dispatch(req: Request, object_path: &str, calls_tx: &Sender<IncomingCall>, reply_timeout: Duration) -> Response {
    if req.path != object_path {
        return Response::err(format!("no object at {}", req.path));
    }
    let Some(call) = RemoteCall::from_method(&req.method) else {
        return Response::err(format!("unknown method: {}", req.method));
    };

    let (reply_tx, reply_rx) = mpsc::channel();
    let deadline = Instant::now() + reply_timeout;
    if calls_tx.send(IncomingCall::new(call, reply_tx, deadline)).is_err() {
        return Response::err("controller is shutting down");
    }
    match reply_rx.recv_timeout(reply_timeout) {
        Ok(response) => response,
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(method = call.method(), "controller did not answer in time");
            Response::err("controller did not answer in time")
        }
        Err(RecvTimeoutError::Disconnected) => Response::err("controller dropped the call"),
    }
}
