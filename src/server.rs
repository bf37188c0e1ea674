//! UDP transport for the DHCP server.
//!
//! Owns the listening socket and the receive loop; everything
//! protocol-level is delegated to [`MessageHandler`]. The handler holds
//! no mutable state, so each datagram is dispatched on its own task.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::handler::MessageHandler;
use crate::packet::{BOOTREQUEST, DhcpPacket};

const DHCP_SERVER_PORT: u16 = 67;
const DHCP_CLIENT_PORT: u16 = 68;
const RECV_BUFFER_SIZE: usize = 1500;

/// The DHCP server: one UDP socket plus the stateless message handler.
pub struct DhcpServer {
    config: Arc<Config>,
    handler: MessageHandler,
    socket: Arc<UdpSocket>,
}

impl DhcpServer {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let socket = Arc::new(Self::create_socket(&config)?);
        let handler = MessageHandler::new(Arc::clone(&config));

        info!(
            "DHCP server starting on {}:{} (base MAC {}, base IP {})",
            config.server_ip, DHCP_SERVER_PORT, config.base_hwaddr, config.base_ip
        );

        Ok(Self {
            config,
            handler,
            socket,
        })
    }

    fn create_socket(config: &Config) -> Result<UdpSocket> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|error| Error::Socket(format!("Failed to create socket: {}", error)))?;

        socket
            .set_reuse_address(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_REUSEADDR: {}", error)))?;

        socket
            .set_broadcast(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_BROADCAST: {}", error)))?;

        socket
            .set_nonblocking(true)
            .map_err(|error| Error::Socket(format!("Failed to set non-blocking: {}", error)))?;

        if let Some(ref interface) = config.interface {
            Self::bind_to_interface(&socket, interface)?;
        }

        let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DHCP_SERVER_PORT);
        socket.bind(&bind_addr.into()).map_err(|error| {
            Error::Socket(format!("Failed to bind to {}: {}", bind_addr, error))
        })?;

        let std_socket: std::net::UdpSocket = socket.into();
        let tokio_socket = UdpSocket::from_std(std_socket).map_err(|error| {
            Error::Socket(format!("Failed to convert to tokio socket: {}", error))
        })?;

        Ok(tokio_socket)
    }

    /// Restricts the socket to a named interface via SO_BINDTODEVICE.
    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn bind_to_interface(socket: &Socket, interface: &str) -> Result<()> {
        socket
            .bind_device(Some(interface.as_bytes()))
            .map_err(|error| {
                Error::Socket(format!(
                    "Failed to bind to interface {}: {}",
                    interface, error
                ))
            })
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn bind_to_interface(_socket: &Socket, interface: &str) -> Result<()> {
        warn!(
            "Binding to interface {} is only supported on Linux and will be ignored",
            interface
        );
        Ok(())
    }

    /// Serves datagrams until the task is cancelled.
    pub async fn run(&self) -> Result<()> {
        let mut buffer = [0u8; RECV_BUFFER_SIZE];

        info!("DHCP server ready and listening");

        loop {
            match self.socket.recv_from(&mut buffer).await {
                Ok((size, source)) => {
                    let data = buffer[..size].to_vec();
                    let handler = self.handler.clone();
                    let socket = Arc::clone(&self.socket);

                    tokio::spawn(async move {
                        if let Err(error) = handle_datagram(&handler, &socket, &data, source).await
                        {
                            warn!("Error handling packet from {}: {}", source, error);
                        }
                    });
                }
                Err(error) => {
                    error!("Error receiving packet: {}", error);
                }
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

async fn handle_datagram(
    handler: &MessageHandler,
    socket: &UdpSocket,
    data: &[u8],
    source: SocketAddr,
) -> Result<()> {
    let packet = DhcpPacket::parse(data)?;

    if packet.op != BOOTREQUEST {
        return Err(Error::InvalidPacket("Expected BOOTREQUEST".to_string()));
    }

    match handler.dispatch(&packet) {
        Some(reply) => send_reply(socket, &reply, &packet).await,
        None => {
            debug!("No reply for {} from {}", packet.format_mac(), source);
            Ok(())
        }
    }
}

/// Sends a reply to the destination chosen by [`reply_destination`].
async fn send_reply(socket: &UdpSocket, reply: &DhcpPacket, request: &DhcpPacket) -> Result<()> {
    let encoded = reply.encode();
    let destination = reply_destination(reply, request);

    socket.send_to(&encoded, destination).await?;

    Ok(())
}

/// Picks the reply destination per RFC 2131 §4.1.
///
/// Relayed requests go back through the relay on the server port.
/// Broadcast requests, requests with no client address, and Naks are
/// broadcast; everything else is unicast to the client's address.
fn reply_destination(reply: &DhcpPacket, request: &DhcpPacket) -> SocketAddr {
    let is_nak = reply.message_type() == Some(crate::options::MessageType::Nak);

    if request.giaddr != Ipv4Addr::UNSPECIFIED {
        SocketAddr::new(std::net::IpAddr::V4(request.giaddr), DHCP_SERVER_PORT)
    } else if is_nak || request.is_broadcast() || request.ciaddr == Ipv4Addr::UNSPECIFIED {
        SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::BROADCAST), DHCP_CLIENT_PORT)
    } else {
        SocketAddr::new(std::net::IpAddr::V4(request.ciaddr), DHCP_CLIENT_PORT)
    }
}
