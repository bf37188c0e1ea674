//! # dhcpmap
//!
//! A DHCPv4 server that derives each client's IPv4 address
//! deterministically from its MAC address.
//!
//! There is no address pool, no lease database, and no crash recovery:
//! any address can be recomputed at any time from the client's hardware
//! address and the server configuration alone. Clients whose MAC shares
//! the configured base prefix get the base IP offset (bitwise OR) by the
//! XOR of the remaining MAC octets; everyone else is ignored.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dhcpmap::{Config, DhcpServer};
//!
//! #[tokio::main]
//! async fn main() -> dhcpmap::Result<()> {
//!     let config = Config::new(
//!         "10.0.0.1/24",
//!         "aa:bb:00:00:00:00",
//!         "10.0.0.1".parse().unwrap(),
//!         None,
//!         vec![],
//!         86400,
//!         None,
//!     )?;
//!     let server = DhcpServer::new(config)?;
//!     server.run().await
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`Config`] - Immutable startup configuration (subnet, base MAC, options)
//! - [`mapper`] - The deterministic MAC-to-IP mapping
//! - [`MessageHandler`] - Stateless per-message dispatch (Offer/Ack/Nak/silence)
//! - [`DhcpServer`] - UDP transport on port 67
//! - [`DhcpPacket`] / [`DhcpOption`] - RFC 2131/2132 wire codec

pub mod config;
pub mod error;
pub mod handler;
pub mod mapper;
pub mod options;
pub mod packet;
pub mod server;

pub use config::{Config, MacAddr};
pub use error::{Error, Result};
pub use handler::MessageHandler;
pub use options::{DhcpOption, MessageType};
pub use packet::DhcpPacket;
pub use server::DhcpServer;
