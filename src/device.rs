//! A single Yeelight device reachable over TCP.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex as StdMutex, PoisonError};
use std::time::Duration;

use log::{debug, warn};
use serde_json::{Map, Value, json};

use crate::command::{CommandFactory, CommandInput};
use crate::config::Config;
use crate::connection::Connection;
use crate::errors::Error;
use crate::response::{CommandResult, Message};
use crate::runtime::{self, Mutex};
use crate::state::DeviceState;

type Result<T> = std::result::Result<T, Error>;

/// A Yeelight fixture and its persistent control connection.
///
/// The connection is opened lazily on the first request and kept for the
/// following ones. Every request carries an id drawn from this device, and
/// the device only accepts the answer carrying that id. `props`
/// notifications pushed by the fixture while a request is pending are folded
/// into the cached [`DeviceState`].
///
/// # Example
///
/// ```
/// use std::net::SocketAddr;
/// use yeelight_rs::{Config, Device};
///
/// let addr: SocketAddr = "192.168.1.20:55443".parse().unwrap();
/// let device = Device::new(addr, &Config::new());
/// assert_eq!(device.next_id(), 1);
/// assert_eq!(device.next_id(), 2);
/// assert!(device.state().main().power().is_none());
/// ```
pub struct Device {
    addr: SocketAddr,
    reconnect: Duration,
    response_timeout: Duration,
    next_id: AtomicU64,
    state: StdMutex<DeviceState>,
    connection: Mutex<Option<Connection>>,
}

impl Device {
    pub const PORT: u16 = 55443;
    const RESPONSE_TIMEOUT_MS: u64 = 3000;

    pub fn new(addr: SocketAddr, config: &Config) -> Self {
        Device {
            addr,
            reconnect: config.socket_reconnect(),
            response_timeout: Duration::from_millis(Self::RESPONSE_TIMEOUT_MS),
            next_id: AtomicU64::new(0),
            state: StdMutex::new(DeviceState::default()),
            connection: Mutex::new(None),
        }
    }

    /// Override how long a request waits for its answer.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Allocate the next correlation id. Ids start at 1.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// A factory building commands bound to this device.
    pub fn factory(&self) -> CommandFactory<'_> {
        CommandFactory::new(self)
    }

    /// Snapshot of the cached state.
    pub fn state(&self) -> DeviceState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn update_state(&self, f: impl FnOnce(&mut DeviceState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Build, send and confirm one command.
    ///
    /// The cached state is only updated once the device answered `"ok"`;
    /// an error answer leaves it untouched.
    pub async fn send(&self, input: CommandInput) -> Result<CommandResult> {
        let command = self.factory().get(input)?;
        let line = serde_json::to_string(&command.data()).map_err(Error::JsonDump)?;
        debug!("{}: sending {:?}", self.addr, command);

        let result = self.request(command.id(), &line).await?;
        if result.is_ok() {
            command.feedback();
        } else {
            warn!("{}: unexpected answer {:?}", self.addr, result.result);
        }
        Ok(result)
    }

    /// Query properties by name and fold the answers into the cached state.
    ///
    /// Returns the raw values in request order; properties the device does
    /// not know come back as empty strings.
    pub async fn get_props(&self, names: &[&str]) -> Result<Vec<Value>> {
        let id = self.next_id();
        let line = serde_json::to_string(&json!({
            "id": id,
            "method": "get_prop",
            "params": names,
        }))
        .map_err(Error::JsonDump)?;

        let result = self.request(id, &line).await?;
        let props: Map<String, Value> = names
            .iter()
            .zip(&result.result)
            .filter(|(_, value)| value.as_str() != Some(""))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        self.update_state(|state| state.apply_props(&props));
        Ok(result.result)
    }

    /// Close the control connection. The next request reopens it.
    pub async fn disconnect(&self) {
        if self.connection.lock().await.take().is_some() {
            debug!("{}: disconnected", self.addr);
        }
    }

    /// Deliver `line` and wait for the answer carrying `id`.
    ///
    /// A failure to connect or to write is retried once on a fresh
    /// connection after the reconnect interval. Once the line is written the
    /// device may have run the command, so later failures are returned as-is.
    async fn request(&self, id: u64, line: &str) -> Result<CommandResult> {
        let mut slot = self.connection.lock().await;
        let mut connection = match self.deliver(slot.take(), line).await {
            Ok(connection) => connection,
            Err(e) if e.is_transport() => {
                warn!(
                    "{}: {}, reconnecting in {:?}",
                    self.addr, e, self.reconnect
                );
                runtime::sleep(self.reconnect).await;
                self.deliver(None, line).await?
            }
            Err(e) => return Err(e),
        };

        let result = runtime::timeout(
            self.response_timeout,
            self.await_response(&mut connection, id),
        )
        .await
        .unwrap_or(Err(Error::Timeout(id)));

        // A read cut short leaves the stream mid-line.
        match &result {
            Err(e) if e.is_transport() || matches!(e, Error::Timeout(_)) => {
                debug!("{}: dropping connection after {}", self.addr, e);
            }
            _ => *slot = Some(connection),
        }
        result
    }

    /// Open a connection if needed and write `line` on it.
    async fn deliver(&self, connection: Option<Connection>, line: &str) -> Result<Connection> {
        let mut connection = match connection {
            Some(connection) => connection,
            None => {
                debug!("{}: connecting", self.addr);
                runtime::timeout(self.response_timeout, Connection::open(self.addr))
                    .await
                    .map_err(|_| Error::socket("connect", deadline_passed()))??
            }
        };

        runtime::timeout(self.response_timeout, connection.write_line(line))
            .await
            .map_err(|_| Error::socket("send", deadline_passed()))??;
        Ok(connection)
    }

    async fn await_response(&self, connection: &mut Connection, id: u64) -> Result<CommandResult> {
        loop {
            let line = connection.read_line().await?;
            let message = match Message::parse(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!("{}: unreadable message {:?}: {}", self.addr, line, e);
                    continue;
                }
            };

            let Some(answered) = message.id() else {
                match message {
                    Message::Notification { method, params } if method == "props" => {
                        self.update_state(|state| state.apply_props(&params));
                    }
                    other => debug!("{}: ignoring {:?}", self.addr, other),
                }
                continue;
            };
            if answered != id {
                debug!("{}: skipping stale answer {}", self.addr, answered);
                continue;
            }

            match message {
                Message::Result(result) => return Ok(result),
                Message::Error { error, .. } => {
                    return Err(Error::Device {
                        code: error.code,
                        message: error.message,
                    });
                }
                Message::Notification { .. } => {}
            }
        }
    }
}

fn deadline_passed() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "deadline passed")
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("addr", &self.addr)
            .field("reconnect", &self.reconnect)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, feature = "runtime-tokio"))]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::config::ConfigParams;
    use crate::feature::Feature;
    use crate::types::{Color, PowerState};

    fn config() -> Config {
        config_with_reconnect(0)
    }

    fn config_with_reconnect(ms: u64) -> Config {
        Config::from_params(ConfigParams {
            discovery_host: Some("127.0.0.1".into()),
            socket_reconnect: Some(ms.into()),
            ..Default::default()
        })
        .unwrap()
    }

    async fn listener() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    async fn read_request(reader: &mut BufReader<TcpStream>) -> Value {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    async fn reply(reader: &mut BufReader<TcpStream>, lines: &[String]) {
        for line in lines {
            reader
                .get_mut()
                .write_all(format!("{line}\r\n").as_bytes())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_send_applies_feedback_and_notifications() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let request = read_request(&mut reader).await;
            assert_eq!(request["method"], "set_rgb");
            assert_eq!(request["params"], json!([0xFF0000, "smooth", 500]));
            let id = request["id"].as_u64().unwrap();
            reply(
                &mut reader,
                &[
                    r#"{"method":"props","params":{"bright":"35","bg_power":"on"}}"#.into(),
                    format!(r#"{{"id":{id},"result":["ok"]}}"#),
                ],
            )
            .await;
        });

        let device = Device::new(addr, &config());
        let result = device.send(CommandInput::rgb(255, 0, 0)).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(result.id, 1);

        let state = device.state();
        assert_eq!(state.main().color(), Some(&Color::rgb(255, 0, 0)));
        assert_eq!(state.main().brightness().unwrap().value(), 35);
        assert_eq!(state.background().power(), Some(true));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_answer_skips_feedback() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let id = read_request(&mut reader).await["id"].as_u64().unwrap();
            reply(
                &mut reader,
                &[format!(
                    r#"{{"id":{id},"error":{{"code":-1,"message":"method not supported"}}}}"#
                )],
            )
            .await;
        });

        let device = Device::new(addr, &config());
        let result = device.send(CommandInput::power(PowerState::On)).await;
        assert!(matches!(result, Err(Error::Device { code: -1, .. })));
        assert_eq!(device.state().main().power(), None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_ok_result_skips_feedback() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let id = read_request(&mut reader).await["id"].as_u64().unwrap();
            reply(&mut reader, &[format!(r#"{{"id":{id},"result":[]}}"#)]).await;
        });

        let device = Device::new(addr, &config());
        let result = device.send(CommandInput::brightness(20)).await.unwrap();
        assert!(!result.is_ok());
        assert_eq!(device.state().main().brightness(), None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_answers_are_skipped() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let id = read_request(&mut reader).await["id"].as_u64().unwrap();
            reply(
                &mut reader,
                &[
                    "garbage".into(),
                    format!(r#"{{"id":{},"result":["ok"]}}"#, id + 100),
                    format!(r#"{{"id":{id},"result":["ok"]}}"#),
                ],
            )
            .await;
        });

        let device = Device::new(addr, &config());
        let result = device.send(CommandInput::toggle()).await.unwrap();
        assert_eq!(result.id, 1);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_props_updates_cache() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let request = read_request(&mut reader).await;
            assert_eq!(request["method"], "get_prop");
            assert_eq!(request["params"], json!(["power", "bright", "bg_ct"]));
            let id = request["id"].as_u64().unwrap();
            reply(
                &mut reader,
                &[format!(r#"{{"id":{id},"result":["off","80",""]}}"#)],
            )
            .await;
        });

        let device = Device::new(addr, &config());
        let values = device
            .get_props(&["power", "bright", "bg_ct"])
            .await
            .unwrap();
        assert_eq!(values, vec![json!("off"), json!("80"), json!("")]);

        let state = device.state();
        assert_eq!(state.main().power(), Some(false));
        assert_eq!(state.main().brightness().unwrap().value(), 80);
        assert_eq!(state.background().temperature(), None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_is_reused() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            for _ in 0..2 {
                let id = read_request(&mut reader).await["id"].as_u64().unwrap();
                reply(&mut reader, &[format!(r#"{{"id":{id},"result":["ok"]}}"#)]).await;
            }
        });

        let device = Device::new(addr, &config());
        device.send(CommandInput::brightness(10)).await.unwrap();
        let second = device
            .send(CommandInput::toggle().with_feature(Feature::DevToggle))
            .await
            .unwrap();
        assert_eq!(second.id, 2);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_written_command_is_not_resent() {
        let (listener, addr) = listener().await;
        let requests = Arc::new(AtomicUsize::new(0));
        let seen = requests.clone();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            read_request(&mut reader).await;
            seen.fetch_add(1, Ordering::SeqCst);
            drop(reader);

            if let Ok(Ok((socket, _))) =
                tokio::time::timeout(Duration::from_millis(300), listener.accept()).await
            {
                let mut reader = BufReader::new(socket);
                read_request(&mut reader).await;
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        let device = Device::new(addr, &config());
        device.update_state(|state| {
            state.apply_props(json!({"power": "on"}).as_object().unwrap())
        });

        let result = device.send(CommandInput::toggle()).await;
        let err = result.unwrap_err();
        assert!(err.is_transport(), "unexpected error {err}");
        server.await.unwrap();

        assert_eq!(requests.load(Ordering::SeqCst), 1);
        assert_eq!(device.state().main().power(), Some(true));
    }

    #[tokio::test]
    async fn test_next_send_reconnects_after_close() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            read_request(&mut reader).await;
            drop(reader);

            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let id = read_request(&mut reader).await["id"].as_u64().unwrap();
            reply(&mut reader, &[format!(r#"{{"id":{id},"result":["ok"]}}"#)]).await;
        });

        let device = Device::new(addr, &config());
        assert!(device.send(CommandInput::set_default()).await.is_err());
        let result = device.send(CommandInput::set_default()).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(result.id, 2);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_refused_connect_is_retried() {
        let (listener, addr) = listener().await;
        drop(listener);

        let server = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let listener = TcpListener::bind(addr).await.unwrap();
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let id = read_request(&mut reader).await["id"].as_u64().unwrap();
            reply(&mut reader, &[format!(r#"{{"id":{id},"result":["ok"]}}"#)]).await;
        });

        let device = Device::new(addr, &config_with_reconnect(300));
        let result = device.send(CommandInput::set_default()).await.unwrap();
        assert!(result.is_ok());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_to_unroutable_address_times_out() {
        let addr = SocketAddr::from((Ipv4Addr::new(10, 255, 255, 1), Device::PORT));
        let device =
            Device::new(addr, &config()).with_response_timeout(Duration::from_millis(100));

        let start = std::time::Instant::now();
        let result = device.send(CommandInput::toggle()).await;
        assert!(matches!(result, Err(Error::Socket { .. })), "{result:?}");
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_response_timeout() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            read_request(&mut reader).await;
            tokio::time::sleep(Duration::from_millis(200)).await;
        });

        let device =
            Device::new(addr, &config()).with_response_timeout(Duration::from_millis(50));
        let result = device.send(CommandInput::stop_flow()).await;
        assert_eq!(result, Err(Error::Timeout(1)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_input_never_connects() {
        let device = Device::new(SocketAddr::from((Ipv4Addr::LOCALHOST, 1)), &config());
        let result = device.send(CommandInput::brightness(0)).await;
        assert!(matches!(result, Err(Error::InvalidCommandParams { .. })));
    }
}
