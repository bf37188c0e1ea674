//! Deterministic MAC-to-IP address mapping.
//!
//! Instead of allocating from a pool, the server computes each client's
//! address from its hardware address and the configured base values. The
//! first two octets of the MAC act as a domain check; the XOR of the
//! remaining four octets against the base MAC is OR-ed onto the base IP.
//! The same inputs always produce the same address, so nothing needs to
//! be remembered between messages or across restarts.

use std::net::Ipv4Addr;

use tracing::{debug, warn};

use crate::config::Config;

/// Computes the IPv4 address for a hardware address, or `None` if the
/// address is outside the managed range.
///
/// `None` is a normal outcome, not an error: the server stays silent and
/// the client falls back to DHCP's own retry behavior.
///
/// A delta that overlaps the netmask's network bits is logged as a
/// warning but still applied; whether two clients can collide this way
/// is an operator configuration concern, not a per-message one.
pub fn map_to_ip(config: &Config, chaddr: [u8; 6]) -> Option<Ipv4Addr> {
    let base_hwaddr = config.base_hwaddr.octets();

    if base_hwaddr[..2] != chaddr[..2] {
        debug!(
            "MAC {} outside managed range (base {})",
            format_mac(&chaddr),
            config.base_hwaddr
        );
        return None;
    }

    let mask = config.netmask.octets();
    let mut addr = config.base_ip.octets();

    for index in 2..6 {
        let delta = base_hwaddr[index] ^ chaddr[index];
        if delta & mask[index - 2] != 0 {
            warn!(
                "MAC {} host-id bits collide with network bits of {}",
                format_mac(&chaddr),
                config.netmask
            );
        }
        addr[index - 2] |= delta;
    }

    let addr = Ipv4Addr::from(addr);
    debug!("Mapped MAC {} to {}", format_mac(&chaddr), addr);
    Some(addr)
}

/// Formats a hardware address as a colon-separated string for logs.
pub fn format_mac(chaddr: &[u8]) -> String {
    use std::fmt::Write;
    let mut result = String::with_capacity(chaddr.len() * 3);
    for (index, byte) in chaddr.iter().enumerate() {
        if index > 0 {
            result.push(':');
        }
        let _ = write!(result, "{:02x}", byte);
    }
    result
}
