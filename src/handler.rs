//! Per-message DHCP dispatch.
//!
//! The handler is stateless across messages: every message is resolved
//! by recomputing the MAC-to-IP mapping, so there is no session state,
//! no lease table, and nothing to lock. "No reply" is a first-class
//! outcome — an unmapped DISCOVER is answered with silence and the
//! client's own retry behavior takes over.

use std::net::Ipv4Addr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::mapper;
use crate::options::{DhcpOption, MessageType};
use crate::packet::DhcpPacket;

/// Resolves inbound DHCP messages to replies.
///
/// Holds only the shared read-only configuration, so a single handler
/// can be invoked concurrently from any number of tasks.
#[derive(Clone)]
pub struct MessageHandler {
    config: Arc<Config>,
}

impl MessageHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Dispatches one decoded message to a reply, or `None` for silence.
    pub fn dispatch(&self, packet: &DhcpPacket) -> Option<DhcpPacket> {
        let mac = packet.format_mac();

        let Some(chaddr) = packet.hardware_address() else {
            debug!("Ignoring message with non-Ethernet hardware address {}", mac);
            return None;
        };

        match packet.message_type() {
            Some(MessageType::Discover) => {
                info!("DISCOVER from {}", mac);
                self.handle_discover(packet, chaddr)
            }
            Some(MessageType::Request) => {
                info!("REQUEST from {}", mac);
                self.handle_request(packet, chaddr)
            }
            Some(MessageType::Release) => {
                // Nothing to release: addresses are derived, not leased.
                info!("RELEASE from {} (no lease state to clear)", mac);
                None
            }
            Some(MessageType::Decline) => {
                // A derived address cannot be blacklisted.
                info!("DECLINE from {} (derived addresses cannot be retired)", mac);
                None
            }
            Some(other) => {
                debug!("Ignoring {} from {}", other, mac);
                None
            }
            None => {
                debug!("Ignoring BOOTP message from {}", mac);
                None
            }
        }
    }

    fn handle_discover(&self, packet: &DhcpPacket, chaddr: [u8; 6]) -> Option<DhcpPacket> {
        let ip = mapper::map_to_ip(&self.config, chaddr)?;

        let options = self.select_options(packet.parameter_request_list());
        let offer = DhcpPacket::create_reply(
            packet,
            MessageType::Offer,
            ip,
            self.config.server_ip,
            options,
        );

        info!("OFFER {} to {}", ip, packet.format_mac());
        Some(offer)
    }

    fn handle_request(&self, packet: &DhcpPacket, chaddr: [u8; 6]) -> Option<DhcpPacket> {
        if let Some(server_id) = packet.server_identifier() {
            if server_id != self.config.server_ip {
                // The client is accepting another server's offer.
                info!(
                    "REQUEST from {} is for different server {}",
                    packet.format_mac(),
                    server_id
                );
                return None;
            }
        }

        if let Some(requested_ip) = packet.requested_ip() {
            // The mapping gates the Ack, but the reply carries the
            // client's requested value rather than the recomputed one.
            if mapper::map_to_ip(&self.config, chaddr).is_some() {
                let options = self.select_options(packet.parameter_request_list());
                let ack = DhcpPacket::create_reply(
                    packet,
                    MessageType::Ack,
                    requested_ip,
                    self.config.server_ip,
                    options,
                );

                info!("ACK {} to {}", requested_ip, packet.format_mac());
                return Some(ack);
            }
        }

        let nak = DhcpPacket::create_reply(
            packet,
            MessageType::Nak,
            Ipv4Addr::UNSPECIFIED,
            self.config.server_ip,
            vec![DhcpOption::ServerIdentifier(self.config.server_ip)],
        );

        info!("NAK to {}", packet.format_mac());
        Some(nak)
    }

    /// All options the server is configured to hand out.
    fn configured_options(&self) -> Vec<DhcpOption> {
        let mut options = vec![DhcpOption::SubnetMask(self.config.netmask)];

        if let Some(router) = self.config.router {
            options.push(DhcpOption::Router(vec![router]));
        }

        if !self.config.dns_servers.is_empty() {
            options.push(DhcpOption::DnsServer(self.config.dns_servers.clone()));
        }

        options
    }

    /// Builds the reply option set for an Offer or Ack.
    ///
    /// Server identifier and lease time are always present. The
    /// remaining configured options follow in the order of the client's
    /// parameter request list, or all of them when no list was sent.
    fn select_options(&self, parameter_request_list: Option<&[u8]>) -> Vec<DhcpOption> {
        let mut options = vec![
            DhcpOption::ServerIdentifier(self.config.server_ip),
            DhcpOption::LeaseTime(self.config.lease_duration_seconds),
        ];

        let mut configured = self.configured_options();
        match parameter_request_list {
            Some(prl) => {
                for code in prl {
                    if let Some(position) = configured
                        .iter()
                        .position(|opt| opt.option_code() == *code)
                    {
                        options.push(configured.remove(position));
                    }
                }
            }
            None => options.extend(configured),
        }

        options
    }
}
