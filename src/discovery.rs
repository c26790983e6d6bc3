//! Device discovery via SSDP-style multicast search.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::device::Device;
use crate::errors::Error;
use crate::feature::Feature;
use crate::runtime::{self, AsyncUdpSocket, Instant, UdpSocket};

type Result<T> = std::result::Result<T, Error>;

/// Headers of a search answer that describe the device's current state.
const STATE_HEADERS: [&str; 8] = [
    "power",
    "bright",
    "color_mode",
    "ct",
    "rgb",
    "hue",
    "sat",
    "name",
];

/// A Yeelight device that answered a discovery search.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredDevice {
    /// Unique device id, e.g. `0x000000000015243f`.
    pub id: String,
    /// Control endpoint taken from the `Location` header.
    pub addr: SocketAddr,
    pub model: Option<String>,
    pub firmware: Option<String>,
    /// Methods the device accepts.
    pub support: Vec<String>,
    /// State advertised in the answer, keyed by property name.
    pub props: Map<String, Value>,
}

impl DiscoveredDevice {
    /// Whether the device advertises `feature` in its `support` header.
    pub fn supports(&self, feature: Feature) -> bool {
        self.support.iter().any(|method| method == feature.method())
    }

    /// Convert into a [`Device`], seeding its cached state from the answer.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let devices = discover_devices(&config, Duration::from_secs(3)).await?;
    /// for found in devices {
    ///     let device = found.into_device(&config);
    /// }
    /// ```
    pub fn into_device(self, config: &Config) -> Device {
        let device = Device::new(self.addr, config);
        device.update_state(|state| {
            state.set_model(self.model);
            state.apply_props(&self.props);
        });
        device
    }
}

/// Parse one search answer.
///
/// # Examples
///
/// ```
/// use yeelight_rs::{Feature, parse_discovery_response};
///
/// let answer = "HTTP/1.1 200 OK\r\n\
///     Location: yeelight://192.168.1.239:55443\r\n\
///     id: 0x000000000015243f\r\n\
///     model: color\r\n\
///     support: get_prop set_power toggle\r\n\
///     power: on\r\n\r\n";
/// let found = parse_discovery_response(answer).unwrap();
/// assert_eq!(found.addr.to_string(), "192.168.1.239:55443");
/// assert!(found.supports(Feature::Toggle));
/// assert!(!found.supports(Feature::StartCf));
/// ```
pub fn parse_discovery_response(response: &str) -> Result<DiscoveredDevice> {
    let headers: HashMap<String, &str> = response
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim()))
        .collect();

    let location = headers
        .get("location")
        .ok_or_else(|| Error::InvalidDiscoveryResponse("missing location".into()))?;
    let addr = location
        .strip_prefix("yeelight://")
        .and_then(|endpoint| endpoint.parse::<SocketAddr>().ok())
        .ok_or_else(|| Error::InvalidDiscoveryResponse(format!("bad location {location}")))?;

    let id = headers
        .get("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::InvalidDiscoveryResponse("missing id".into()))?;

    let props = STATE_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .map(|value| (name.to_string(), Value::String(value.to_string())))
        })
        .collect();

    Ok(DiscoveredDevice {
        id: id.to_string(),
        addr,
        model: headers.get("model").map(|m| m.to_string()),
        firmware: headers.get("fw_ver").map(|f| f.to_string()),
        support: headers
            .get("support")
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default(),
        props,
    })
}

fn search_message(config: &Config) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\nHOST: {}\r\nMAN: \"ssdp:discover\"\r\nST: wifi_bulb\r\n",
        config.multicast_addr()
    )
}

/// Discover Yeelight devices on the local network.
///
/// Sends one multicast search and collects answers until
/// `discovery_timeout` elapses. Devices answering more than once are
/// reported once, keyed by their id.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use yeelight_rs::{Config, discover_devices};
///
/// let devices = discover_devices(&Config::new(), Duration::from_secs(3)).await?;
/// for found in devices {
///     println!("{} {} at {}", found.id, found.model.as_deref().unwrap_or("?"), found.addr);
/// }
/// ```
pub async fn discover_devices(
    config: &Config,
    discovery_timeout: Duration,
) -> Result<Vec<DiscoveredDevice>> {
    let socket = UdpSocket::bind(&config.bind_addr().to_string())
        .await
        .map_err(|e| Error::socket("bind", e))?;

    socket
        .send_to(
            search_message(config).as_bytes(),
            &config.multicast_addr().to_string(),
        )
        .await
        .map_err(|e| Error::socket("send_to", e))?;

    let discovered = collect_answers(&socket, discovery_timeout).await;
    debug!("discovered {} device(s)", discovered.len());
    Ok(discovered)
}

/// Read search answers from `socket` until `discovery_timeout` elapses or
/// the socket fails.
async fn collect_answers<S: AsyncUdpSocket>(
    socket: &S,
    discovery_timeout: Duration,
) -> Vec<DiscoveredDevice> {
    let mut discovered: HashMap<String, DiscoveredDevice> = HashMap::new();
    let start = Instant::now();
    let mut buffer = [0u8; 4096];
    let recv_timeout = Duration::from_millis(500);

    while start.elapsed() < discovery_timeout {
        match runtime::timeout(recv_timeout, socket.recv_from(&mut buffer)).await {
            Ok(Ok((size, from))) => {
                let Ok(response) = std::str::from_utf8(&buffer[..size]) else {
                    debug!("{}: discovery answer is not UTF-8", from);
                    continue;
                };
                trace!("discovery answer from {}: {:?}", from, response);
                match parse_discovery_response(response) {
                    Ok(found) => {
                        discovered.entry(found.id.clone()).or_insert(found);
                    }
                    Err(e) => debug!("{}: {}", from, e),
                }
            }
            Ok(Err(e)) => {
                debug!("discovery socket failed, stopping search: {}", e);
                break;
            }
            Err(_) => continue,
        }
    }

    discovered.into_values().collect()
}
