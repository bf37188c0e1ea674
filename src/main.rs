use std::net::Ipv4Addr;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dhcpmap::{Config, DhcpServer, Result};

#[derive(Parser)]
#[command(name = "dhcpmap")]
#[command(author, version, about = "A DHCP server that derives addresses from MAC addresses", long_about = None)]
struct Cli {
    /// Subnet to offer, in CIDR form (e.g. 10.0.0.1/24); the address
    /// part is the base IP clients are mapped from
    #[arg(long)]
    subnet: String,

    /// Base MAC address (e.g. aa:bb:00:00:00:00); clients must share
    /// its first two octets
    #[arg(long)]
    mac: String,

    /// This server's own IPv4 address
    #[arg(long)]
    server_ip: Ipv4Addr,

    /// Router to offer over DHCP
    #[arg(long)]
    router: Option<Ipv4Addr>,

    /// DNS server to offer over DHCP (repeatable)
    #[arg(long)]
    dns: Vec<Ipv4Addr>,

    /// Advertised lease duration in seconds
    #[arg(long, default_value_t = 86400)]
    lease_duration: u32,

    /// Network interface to listen on (Linux only)
    #[arg(long)]
    interface: Option<String>,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run,
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    // Fatal on any malformed value: never serve from a bad configuration.
    let config = Config::new(
        &cli.subnet,
        &cli.mac,
        cli.server_ip,
        cli.router,
        cli.dns,
        cli.lease_duration,
        cli.interface,
    )?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let server = DhcpServer::new(config)?;

            tokio::select! {
                result = server.run() => result,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server");
                    Ok(())
                }
            }
        }
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
