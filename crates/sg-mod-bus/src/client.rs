use std::io::{self, BufReader, BufWriter};
use std::os::unix::net::UnixStream;
use std::time::Duration;

use sg_base::ServiceIdentity;

use crate::BusError;
use crate::protocol::{ReadError, RemoteCall, Request, Response, read_message, write_message};

/// Connection to the instance currently holding the name.
pub struct RemoteHandle {
    identity: ServiceIdentity,
    timeout: Duration,
    reader: BufReader<UnixStream>,
    writer: BufWriter<UnixStream>,
}

impl RemoteHandle {
    /// Connect to the holder of `identity`. A claimed name with nobody
    /// listening is [`BusError::Unreachable`].
    pub fn resolve(identity: &ServiceIdentity, timeout: Duration) -> Result<Self, BusError> {
        if timeout.is_zero() {
            return Err(BusError::ZeroTimeout);
        }
        let socket_path = identity.socket_path();
        let stream = UnixStream::connect(&socket_path)
            .map_err(|source| BusError::Unreachable { name: identity.name.clone(), source })?;
        let local = |source| BusError::Io { path: socket_path.clone(), source };
        stream.set_read_timeout(Some(timeout)).map_err(local)?;
        stream.set_write_timeout(Some(timeout)).map_err(local)?;
        let read_half = stream.try_clone().map_err(local)?;
        Ok(Self {
            identity: identity.clone(),
            timeout,
            reader: BufReader::new(read_half),
            writer: BufWriter::new(stream),
        })
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// Issue one call and wait for its reply.
    pub fn call(&mut self, call: RemoteCall) -> Result<Response, BusError> {
        let request = Request::new(&self.identity.path, call);
        write_message(&mut self.writer, &request).map_err(|e| self.transport_error(e))?;

        let response: Response = match read_message(&mut self.reader) {
            Ok(Some(r)) => r,
            Ok(None) => {
                let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed before reply");
                return Err(self.transport_error(eof));
            }
            Err(ReadError::Io(e)) => return Err(self.transport_error(e)),
            Err(ReadError::Decode(e)) => return Err(e),
        };

        if !response.ok {
            let message = response.error.unwrap_or_else(|| "no reason given".to_string());
            return Err(BusError::Remote { method: call.method(), message });
        }
        tracing::debug!(method = call.method(), "remote call delivered");
        Ok(response)
    }

    pub fn show(&mut self) -> Result<(), BusError> {
        self.call(RemoteCall::Show).map(|_| ())
    }

    pub fn hide(&mut self) -> Result<(), BusError> {
        self.call(RemoteCall::Hide).map(|_| ())
    }

    pub fn get_visible(&mut self) -> Result<bool, BusError> {
        let response = self.call(RemoteCall::GetVisible)?;
        response.visible.ok_or_else(|| BusError::Remote {
            method: RemoteCall::GetVisible.method(),
            message: "reply carried no visibility".to_string(),
        })
    }

    pub fn do_inspect(&mut self) -> Result<(), BusError> {
        self.call(RemoteCall::DoInspect).map(|_| ())
    }

    fn transport_error(&self, e: io::Error) -> BusError {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                BusError::Timeout { name: self.identity.name.clone(), timeout: self.timeout }
            }
            _ => BusError::Unreachable { name: self.identity.name.clone(), source: e },
        }
    }
}
