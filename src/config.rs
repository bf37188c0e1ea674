//! Server configuration.
//!
//! The configuration is built once from command-line flags before the
//! server starts serving, then shared read-only for the process lifetime.
//! There is no configuration file and no runtime mutation; every address
//! the server hands out is a pure function of this struct and the
//! client's hardware address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A 6-byte Ethernet hardware address.
///
/// Parsed from the usual `aa:bb:cc:dd:ee:ff` notation (`-` separators
/// are accepted too). Serialized as a string in configuration dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(|c| c == ':' || c == '-').collect();
        if parts.len() != 6 {
            return Err(Error::InvalidConfig(format!(
                "MAC address must have 6 octets: {}",
                s
            )));
        }

        let mut octets = [0u8; 6];
        for (index, part) in parts.iter().enumerate() {
            octets[index] = u8::from_str_radix(part, 16).map_err(|_| {
                Error::InvalidConfig(format!("Invalid MAC address octet '{}' in {}", part, s))
            })?;
        }

        Ok(Self(octets))
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable server configuration.
///
/// `base_ip` and `netmask` come from the `--subnet` CIDR flag: the
/// address part as written becomes the base IP, the prefix length
/// becomes the mask. Clients whose hardware address shares the first
/// two octets of `base_hwaddr` get `base_ip` offset by the XOR of the
/// remaining four octets (see [`crate::mapper`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_ip: Ipv4Addr,
    pub base_hwaddr: MacAddr,
    pub base_ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub router: Option<Ipv4Addr>,
    pub dns_servers: Vec<Ipv4Addr>,
    pub lease_duration_seconds: u32,
    pub interface: Option<String>,
}

impl Config {
    /// Builds the configuration from the raw startup flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a malformed subnet or MAC,
    /// or values that fail [`validate`](Self::validate). These are fatal:
    /// the caller must not start serving.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subnet: &str,
        mac: &str,
        server_ip: Ipv4Addr,
        router: Option<Ipv4Addr>,
        dns_servers: Vec<Ipv4Addr>,
        lease_duration_seconds: u32,
        interface: Option<String>,
    ) -> Result<Self> {
        let (base_ip, netmask) = parse_cidr(subnet)?;
        let base_hwaddr: MacAddr = mac.parse()?;

        let config = Self {
            server_ip,
            base_hwaddr,
            base_ip,
            netmask,
            router,
            dns_servers,
            lease_duration_seconds,
            interface,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lease_duration_seconds == 0 {
            return Err(Error::InvalidConfig(
                "lease duration must be greater than 0".to_string(),
            ));
        }

        if self.base_hwaddr.octets() == [0u8; 6] {
            return Err(Error::InvalidConfig(
                "base MAC address must not be all zeros".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses an IPv4 subnet in CIDR form, e.g. `10.0.0.1/24`.
///
/// Returns the address exactly as written (not the network address) and
/// the netmask derived from the prefix length. The written address is
/// the base every mapped client address is offset from, so host bits
/// are meaningful here.
pub fn parse_cidr(s: &str) -> Result<(Ipv4Addr, Ipv4Addr)> {
    let (addr_part, prefix_part) = s
        .split_once('/')
        .ok_or_else(|| Error::InvalidConfig(format!("Subnet must be in CIDR form: {}", s)))?;

    let addr: Ipv4Addr = addr_part
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("Invalid subnet address: {}", addr_part)))?;

    let prefix: u32 = prefix_part
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("Invalid prefix length: {}", prefix_part)))?;
    if prefix > 32 {
        return Err(Error::InvalidConfig(format!(
            "Prefix length must be 0-32: {}",
            prefix
        )));
    }

    let mask = if prefix == 0 {
        0u32
    } else {
        u32::MAX << (32 - prefix)
    };

    Ok((addr, Ipv4Addr::from(mask)))
}
