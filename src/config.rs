//! Runtime configuration for discovery and the device transport.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;
use crate::network::{local_ipv4, parse_ipv4, parse_port};

type Result<T> = std::result::Result<T, Error>;

/// Partial configuration as supplied by the caller.
///
/// Every field is optional; missing fields take their defaults when resolved
/// into a [`Config`]. The record deserializes from camelCase keys:
///
/// ```
/// use yeelight_rs::{Config, ConfigParams};
///
/// let params: ConfigParams = serde_json::from_str(r#"{"socketReconnect": 1000}"#).unwrap();
/// let config = Config::from_params(params).unwrap();
/// assert_eq!(config.socket_reconnect().as_millis(), 1000);
/// assert_eq!(config.discovery_port(), 1982);
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigParams {
    /// Multicast port.
    pub discovery_port: Option<i64>,
    /// Multicast address.
    pub discovery_ip: Option<String>,
    /// Local machine address used to bind discovery sockets.
    pub discovery_host: Option<String>,
    /// Reconnect interval in milliseconds. Any non-negative JSON number is
    /// accepted; other values fail when resolved.
    pub socket_reconnect: Option<Value>,
}

/// Fully resolved configuration.
///
/// A `Config` never holds an unset field: it is either built from defaults
/// or from a validated [`ConfigParams`], and is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    discovery_port: u16,
    discovery_ip: Ipv4Addr,
    discovery_host: Ipv4Addr,
    socket_reconnect: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const DEFAULT_DISCOVERY_PORT: u16 = 1982;
    pub const DEFAULT_DISCOVERY_IP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
    pub const DEFAULT_DISCOVERY_HOST: Ipv4Addr = Ipv4Addr::UNSPECIFIED;
    pub const DEFAULT_SOCKET_RECONNECT_MS: u64 = 5000;

    /// Build a configuration from defaults, detecting the local host address.
    pub fn new() -> Self {
        Config {
            discovery_port: Self::DEFAULT_DISCOVERY_PORT,
            discovery_ip: Self::DEFAULT_DISCOVERY_IP,
            discovery_host: Self::localhost(),
            socket_reconnect: Duration::from_millis(Self::DEFAULT_SOCKET_RECONNECT_MS),
        }
    }

    /// Resolve a partial configuration, validating each supplied field.
    ///
    /// Host detection only runs when no host was supplied at all; a supplied
    /// host is validated as-is, even if detection would have succeeded.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_rs::{Config, ConfigParams, Error};
    ///
    /// let err = Config::from_params(ConfigParams {
    ///     discovery_port: Some(99999),
    ///     ..Default::default()
    /// });
    /// assert!(matches!(err, Err(Error::InvalidPort(_))));
    /// ```
    pub fn from_params(params: ConfigParams) -> Result<Self> {
        Ok(Config {
            discovery_port: Self::port(params.discovery_port)?,
            discovery_ip: Self::address(params.discovery_ip.as_deref())?,
            discovery_host: Self::host(params.discovery_host.as_deref())?,
            socket_reconnect: Self::reconnect(params.socket_reconnect.as_ref())?,
        })
    }

    pub fn discovery_port(&self) -> u16 {
        self.discovery_port
    }

    pub fn discovery_ip(&self) -> Ipv4Addr {
        self.discovery_ip
    }

    pub fn discovery_host(&self) -> Ipv4Addr {
        self.discovery_host
    }

    pub fn socket_reconnect(&self) -> Duration {
        self.socket_reconnect
    }

    /// Destination of discovery searches.
    pub fn multicast_addr(&self) -> SocketAddr {
        SocketAddr::from((self.discovery_ip, self.discovery_port))
    }

    /// Local address discovery sockets bind to (ephemeral port).
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((self.discovery_host, 0))
    }

    fn port(port: Option<i64>) -> Result<u16> {
        match port {
            None => Ok(Self::DEFAULT_DISCOVERY_PORT),
            Some(port) => parse_port(port),
        }
    }

    fn address(ip: Option<&str>) -> Result<Ipv4Addr> {
        match ip {
            None => Ok(Self::DEFAULT_DISCOVERY_IP),
            Some(ip) => parse_ipv4(ip),
        }
    }

    fn host(ip: Option<&str>) -> Result<Ipv4Addr> {
        match ip {
            None => Ok(Self::localhost()),
            Some(ip) => parse_ipv4(ip),
        }
    }

    fn localhost() -> Ipv4Addr {
        local_ipv4().unwrap_or(Self::DEFAULT_DISCOVERY_HOST)
    }

    fn reconnect(interval: Option<&Value>) -> Result<Duration> {
        let Some(value) = interval.filter(|v| !v.is_null()) else {
            return Ok(Duration::from_millis(Self::DEFAULT_SOCKET_RECONNECT_MS));
        };
        value
            .as_f64()
            .filter(|ms| *ms >= 0.0)
            .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok())
            .ok_or_else(|| Error::InvalidReconnectInterval(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_host() -> Ipv4Addr {
        local_ipv4().unwrap_or(Ipv4Addr::UNSPECIFIED)
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.discovery_port(), 1982);
        assert_eq!(config.discovery_ip(), Ipv4Addr::new(239, 255, 255, 250));
        assert_eq!(config.socket_reconnect(), Duration::from_millis(5000));
        assert_eq!(config.discovery_host(), expected_host());
    }

    #[test]
    fn test_empty_params_match_defaults() {
        let config = Config::from_params(ConfigParams::default()).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_negative_reconnect_rejected() {
        let result = Config::from_params(ConfigParams {
            socket_reconnect: Some((-1).into()),
            ..Default::default()
        });
        assert_eq!(result, Err(Error::InvalidReconnectInterval("-1".into())));
    }

    #[test]
    fn test_zero_reconnect_accepted() {
        let config = Config::from_params(ConfigParams {
            socket_reconnect: Some(0.into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.socket_reconnect(), Duration::ZERO);
    }

    #[test]
    fn test_fractional_reconnect_accepted() {
        let params: ConfigParams =
            serde_json::from_str(r#"{"socketReconnect": 1500.5}"#).unwrap();
        let config = Config::from_params(params).unwrap();
        assert_eq!(config.socket_reconnect().as_millis(), 1500);
    }

    #[test]
    fn test_non_numeric_reconnect_rejected() {
        let params: ConfigParams =
            serde_json::from_str(r#"{"socketReconnect": "5000"}"#).unwrap();
        assert_eq!(
            Config::from_params(params),
            Err(Error::InvalidReconnectInterval(r#""5000""#.into()))
        );

        let params: ConfigParams = serde_json::from_str(r#"{"socketReconnect": true}"#).unwrap();
        assert!(matches!(
            Config::from_params(params),
            Err(Error::InvalidReconnectInterval(_))
        ));

        let params: ConfigParams = serde_json::from_str(r#"{"socketReconnect": 1e300}"#).unwrap();
        assert!(matches!(
            Config::from_params(params),
            Err(Error::InvalidReconnectInterval(_))
        ));
    }

    #[test]
    fn test_null_reconnect_uses_default() {
        let params: ConfigParams = serde_json::from_str(r#"{"socketReconnect": null}"#).unwrap();
        let config = Config::from_params(params).unwrap();
        assert_eq!(config.socket_reconnect(), Duration::from_millis(5000));
    }

    #[test]
    fn test_port_out_of_range() {
        let result = Config::from_params(ConfigParams {
            discovery_port: Some(99999),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidPort(_))));
    }

    #[test]
    fn test_invalid_multicast_address() {
        let result = Config::from_params(ConfigParams {
            discovery_ip: Some("239.255.255".into()),
            ..Default::default()
        });
        assert_eq!(result, Err(Error::InvalidAddress("239.255.255".into())));
    }

    #[test]
    fn test_supplied_host_skips_detection() {
        let config = Config::from_params(ConfigParams {
            discovery_host: Some("192.168.1.50".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.discovery_host(), Ipv4Addr::new(192, 168, 1, 50));

        let result = Config::from_params(ConfigParams {
            discovery_host: Some("not-an-ip".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_socket_addrs() {
        let config = Config::from_params(ConfigParams {
            discovery_port: Some(1990),
            discovery_host: Some("10.0.0.2".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.multicast_addr().to_string(), "239.255.255.250:1990");
        assert_eq!(config.bind_addr().to_string(), "10.0.0.2:0");
    }
}
