//! Single-instance arbitration and the remote-call surface.
//!
//! [`arbitrate`] either claims the session-wide name, making this process the
//! resident server, or resolves a handle to whoever holds it. Losing the claim
//! is the normal way a second launch finds the first; it is not an error.
pub mod claim;
pub mod client;
mod error;
pub mod protocol;
pub mod server;

use std::time::Duration;

use sg_base::ServiceIdentity;

pub use claim::{ClaimOutcome, NameClaim, try_claim};
pub use client::RemoteHandle;
pub use error::BusError;
pub use protocol::{RemoteCall, Response};
pub use server::{BusServer, IncomingCall};

pub enum Arbitration {
    /// We hold the name; start the resident controller.
    Server(NameClaim),
    /// Someone else does; forward to them and exit.
    Client(RemoteHandle),
}

/// Claim `identity` or connect to its holder. Never waits for the name and
/// never retries the claim after losing it.
pub fn arbitrate(identity: &ServiceIdentity, timeout: Duration) -> Result<Arbitration, BusError> {
    match try_claim(identity)? {
        ClaimOutcome::Owned(claim) => Ok(Arbitration::Server(claim)),
        ClaimOutcome::Contended => RemoteHandle::resolve(identity, timeout).map(Arbitration::Client),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::os::unix::net::UnixStream;
    use std::path::Path;
    use std::sync::mpsc::{self, Receiver};
    use std::thread;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn identity(dir: &Path) -> ServiceIdentity {
        ServiceIdentity::new("org.spyglass.Test", "/org/spyglass/Test", dir)
    }

    fn expect_server(arb: Arbitration) -> NameClaim {
        match arb {
            Arbitration::Server(claim) => claim,
            Arbitration::Client(_) => panic!("expected to win the claim"),
        }
    }

    fn expect_client(arb: Arbitration) -> RemoteHandle {
        match arb {
            Arbitration::Client(handle) => handle,
            Arbitration::Server(_) => panic!("expected to lose the claim"),
        }
    }

    /// Plays the event loop: answers `n` calls, tracking a visible flag.
    fn answer_calls(rx: Receiver<IncomingCall>, n: usize) -> thread::JoinHandle<Vec<RemoteCall>> {
        thread::spawn(move || {
            let mut visible = false;
            let mut seen = Vec::new();
            for incoming in rx.iter().take(n) {
                seen.push(incoming.call);
                let response = match incoming.call {
                    RemoteCall::Show => {
                        visible = !visible;
                        Response::ok()
                    }
                    RemoteCall::Hide | RemoteCall::DoInspect => {
                        visible = false;
                        Response::ok()
                    }
                    RemoteCall::GetVisible => Response::ok_visible(visible),
                };
                incoming.reply(response);
            }
            seen
        })
    }

    #[test]
    fn second_launch_becomes_client_and_reaches_server() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());

        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        let (tx, rx) = mpsc::channel();
        let _server = BusServer::start(claim, tx, TIMEOUT).unwrap();
        let loop_thread = answer_calls(rx, 4);

        let mut client = expect_client(arbitrate(&id, TIMEOUT).unwrap());
        client.show().unwrap();
        assert!(client.get_visible().unwrap());
        client.do_inspect().unwrap();
        assert!(!client.get_visible().unwrap());

        let seen = loop_thread.join().unwrap();
        assert_eq!(seen, vec![RemoteCall::Show, RemoteCall::GetVisible, RemoteCall::DoInspect, RemoteCall::GetVisible]);
    }

    #[test]
    fn claimed_name_without_listener_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        // Holder alive but its socket is gone (crash window)
        std::fs::remove_file(id.socket_path()).unwrap();

        let err = match arbitrate(&id, TIMEOUT) {
            Err(e) => e,
            Ok(_) => panic!("a dead socket must not look like a live instance"),
        };
        assert!(matches!(err, BusError::Unreachable { .. }));
        drop(claim);
    }

    #[test]
    fn silent_holder_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        // Listener bound but nobody accepts or answers
        let mut client = RemoteHandle::resolve(&id, Duration::from_millis(200)).unwrap();
        assert!(matches!(client.show(), Err(BusError::Timeout { .. })));
        drop(claim);
    }

    #[test]
    fn loop_gone_is_reported_not_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        let (tx, rx) = mpsc::channel();
        let _server = BusServer::start(claim, tx, TIMEOUT).unwrap();
        drop(rx);

        let mut client = expect_client(arbitrate(&id, TIMEOUT).unwrap());
        assert!(matches!(client.show(), Err(BusError::Remote { method: "show", .. })));
    }

    #[test]
    fn wrong_path_and_unknown_method_get_error_replies() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        let (tx, _rx) = mpsc::channel();
        let _server = BusServer::start(claim, tx, TIMEOUT).unwrap();

        let mut stream = UnixStream::connect(id.socket_path()).unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();

        writeln!(stream, r#"{{"path":"/elsewhere","method":"show"}}"#).unwrap();
        reader.read_line(&mut line).unwrap();
        let resp: Response = serde_json::from_str(&line).unwrap();
        assert!(!resp.ok);
        assert!(resp.error.unwrap().contains("/elsewhere"));

        line.clear();
        writeln!(stream, r#"{{"path":"/org/spyglass/Test","method":"quit"}}"#).unwrap();
        reader.read_line(&mut line).unwrap();
        let resp: Response = serde_json::from_str(&line).unwrap();
        assert_eq!(resp.error.as_deref(), Some("unknown method: quit"));
    }

    #[test]
    fn zero_timeout_is_refused_not_misreported() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        let (tx, _rx) = mpsc::channel();
        let _server = BusServer::start(claim, tx, TIMEOUT).unwrap();

        // A live server must never look unreachable because of a bad timeout.
        let err = match arbitrate(&id, Duration::ZERO) {
            Err(e) => e,
            Ok(_) => panic!("zero timeout must be refused"),
        };
        assert!(matches!(err, BusError::ZeroTimeout));
    }

    #[test]
    fn server_refuses_zero_reply_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        let (tx, _rx) = mpsc::channel();
        let err = match BusServer::start(claim, tx, Duration::ZERO) {
            Err(e) => e,
            Ok(_) => panic!("zero reply timeout must be refused"),
        };
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn unanswered_call_expires_before_the_loop_sees_it() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        let (tx, rx) = mpsc::channel();
        let _server = BusServer::start(claim, tx, Duration::from_millis(100)).unwrap();

        let mut client = expect_client(arbitrate(&id, TIMEOUT).unwrap());
        assert!(matches!(client.show(), Err(BusError::Remote { .. })));

        // The loop was busy; by the time it looks, the call is stale.
        let queued = rx.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(queued.call, RemoteCall::Show);
        assert!(queued.is_expired(std::time::Instant::now()));
    }

    #[test]
    fn stopping_the_server_frees_the_name() {
        let dir = tempfile::tempdir().unwrap();
        let id = identity(dir.path());
        let claim = expect_server(arbitrate(&id, TIMEOUT).unwrap());
        let (tx, _rx) = mpsc::channel();
        let server = BusServer::start(claim, tx, TIMEOUT).unwrap();
        drop(server);
        assert!(!id.socket_path().exists());
        expect_server(arbitrate(&id, TIMEOUT).unwrap());
    }
}
