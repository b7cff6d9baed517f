use crate::rpc::{RpcArg, RpcError, RpcRequest, RpcTransport, decode_response, encode_request};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
#[cfg(unix)]
use std::{
    io::{BufRead, BufReader, Write},
    os::unix::net::UnixStream,
};
use tracing::{debug, trace};

/// RPC transport over a Unix domain socket, one connection per service.
pub struct SocketTransport {
    service: String,
    #[cfg(unix)]
    reader: BufReader<UnixStream>,
    #[cfg(unix)]
    writer: UnixStream,
}

impl SocketTransport {
    #[cfg(unix)]
    pub fn connect(path: &Path, service: &str, timeout: Duration) -> Result<Self, RpcError> {
        let stream = UnixStream::connect(path)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        let writer = stream.try_clone()?;
        debug!(service, path = %path.display(), "connected rpc socket");
        Ok(Self {
            service: service.to_string(),
            reader: BufReader::new(stream),
            writer,
        })
    }

    #[cfg(not(unix))]
    pub fn connect(path: &Path, service: &str, _timeout: Duration) -> Result<Self, RpcError> {
        debug!(service, path = %path.display(), "unix sockets unavailable on this platform");
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "daemon sockets require a unix platform",
        )
        .into())
    }
}

impl RpcTransport for SocketTransport {
    fn service(&self) -> &str {
        &self.service
    }

    #[cfg(unix)]
    fn call(&mut self, procedure: &str, args: &[RpcArg]) -> Result<Value, RpcError> {
        let request = RpcRequest {
            service: self.service.clone(),
            procedure: procedure.to_string(),
            args: args.to_vec(),
        };
        trace!(service = %self.service, procedure, "rpc call");
        self.writer.write_all(&encode_request(&request)?)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(RpcError::Disconnected);
        }
        decode_response(&line)?.into_result()
    }

    #[cfg(not(unix))]
    fn call(&mut self, procedure: &str, _args: &[RpcArg]) -> Result<Value, RpcError> {
        trace!(service = %self.service, procedure, "rpc call on unsupported platform");
        Err(RpcError::Disconnected)
    }
}
