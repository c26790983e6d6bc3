//! Line-delimited JSON transport over TCP.

use std::net::SocketAddr;

use futures::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use log::trace;

use crate::errors::Error;
use crate::runtime::{AsyncTcpStream, TcpStream};

type Result<T> = std::result::Result<T, Error>;

/// An open socket to one device, framing messages by newline.
pub(crate) struct Connection {
    stream: BufReader<TcpStream>,
}

impl Connection {
    /// Longest line accepted from a device, terminator included.
    pub(crate) const MAX_LINE: usize = 16 * 1024;

    pub(crate) async fn open(addr: SocketAddr) -> Result<Self> {
        let stream = <TcpStream as AsyncTcpStream>::connect(addr)
            .await
            .map_err(|e| Error::socket("connect", e))?;
        Ok(Connection {
            stream: BufReader::new(stream),
        })
    }

    /// Send one message; the newline terminator is appended here.
    pub(crate) async fn write_line(&mut self, line: &str) -> Result<()> {
        trace!("-> {}", line);
        let mut bytes = Vec::with_capacity(line.len() + 2);
        bytes.extend_from_slice(line.as_bytes());
        bytes.extend_from_slice(b"\r\n");

        let stream = self.stream.get_mut();
        stream
            .write_all(&bytes)
            .await
            .map_err(|e| Error::socket("send", e))?;
        stream.flush().await.map_err(|e| Error::socket("send", e))
    }

    /// Read the next non-empty line, without its terminator.
    ///
    /// A line longer than the framing limit fails with
    /// [`Error::MessageTooLong`]; the connection must then be dropped.
    pub(crate) async fn read_line(&mut self) -> Result<String> {
        loop {
            let mut line = Vec::new();
            let limit = Self::MAX_LINE as u64;
            let n = (&mut self.stream)
                .take(limit)
                .read_until(b'\n', &mut line)
                .await
                .map_err(|e| Error::socket("receive", e))?;

            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            if line.last() != Some(&b'\n') {
                return Err(if n as u64 >= limit {
                    Error::MessageTooLong(Self::MAX_LINE)
                } else {
                    Error::ConnectionClosed
                });
            }

            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }

            let line = String::from_utf8(line).map_err(Error::Utf8Decode)?;
            trace!("<- {}", line);
            return Ok(line);
        }
    }
}
