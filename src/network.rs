//! Port/address validation and local address detection.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::str::FromStr;

use log::debug;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Validate a network port.
///
/// # Examples
///
/// ```
/// use yeelight_rs::network::parse_port;
///
/// assert_eq!(parse_port(1982).unwrap(), 1982);
/// assert!(parse_port(0).is_err());
/// assert!(parse_port(99999).is_err());
/// ```
pub fn parse_port(port: i64) -> Result<u16> {
    match u16::try_from(port) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(Error::InvalidPort(port.to_string())),
    }
}

/// Validate an IPv4 literal in dotted-quad form.
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
/// use yeelight_rs::network::parse_ipv4;
///
/// assert_eq!(parse_ipv4("239.255.255.250").unwrap(), Ipv4Addr::new(239, 255, 255, 250));
/// assert!(parse_ipv4("256.1.1.1").is_err());
/// assert!(parse_ipv4("localhost").is_err());
/// ```
pub fn parse_ipv4(ip: &str) -> Result<Ipv4Addr> {
    Ipv4Addr::from_str(ip).map_err(|_| Error::InvalidAddress(ip.to_string()))
}

/// Find the IPv4 address of the interface used to reach the local network.
///
/// No packet is sent: connecting a UDP socket only asks the OS for a route.
/// Returns `None` when there is no usable (non-loopback) route.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let route_target = SocketAddr::from((Ipv4Addr::new(10, 255, 255, 255), 1));
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    if let Err(e) = socket.connect(route_target) {
        debug!("local address detection failed: {}", e);
        return None;
    }

    match socket.local_addr().ok()? {
        SocketAddr::V4(addr) if !addr.ip().is_unspecified() && !addr.ip().is_loopback() => {
            Some(*addr.ip())
        }
        _ => None,
    }
}
