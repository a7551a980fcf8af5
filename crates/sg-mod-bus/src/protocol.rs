//! Wire format: one JSON object per line in each direction.
use std::io::{self, BufRead, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::BusError;

/// The four calls the resident instance answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    Show,
    Hide,
    GetVisible,
    DoInspect,
}

impl RemoteCall {
    pub const ALL: [RemoteCall; 4] = [RemoteCall::Show, RemoteCall::Hide, RemoteCall::GetVisible, RemoteCall::DoInspect];

    pub fn method(self) -> &'static str {
        match self {
            RemoteCall::Show => "show",
            RemoteCall::Hide => "hide",
            RemoteCall::GetVisible => "getVisible",
            RemoteCall::DoInspect => "doInspect",
        }
    }

    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.method() == method)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub path: String,
    pub method: String,
}

impl Request {
    pub fn new(path: &str, call: RemoteCall) -> Self {
        Self { path: path.to_string(), method: call.method().to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self { ok: true, visible: None, error: None }
    }
    pub fn ok_visible(visible: bool) -> Self {
        Self { ok: true, visible: Some(visible), error: None }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self { ok: false, visible: None, error: Some(msg.into()) }
    }
}

pub fn write_message<W: Write, T: Serialize>(writer: &mut W, msg: &T) -> io::Result<()> {
    let mut line = serde_json::to_vec(msg).map_err(io::Error::other)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()
}

/// Read one message. `Ok(None)` means the peer closed the stream.
pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>, ReadError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).map_err(ReadError::Io)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    serde_json::from_str(line.trim_end()).map(Some).map_err(|e| ReadError::Decode(e.into()))
}

#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    Decode(BusError),
}
