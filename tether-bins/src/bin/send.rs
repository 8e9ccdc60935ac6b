//! Deliver one payload through an ordered failover list
//!
//! Connects to the first reachable endpoint and performs one resilient write:
//! if the write fails, the connection is re-established (failing over if
//! needed) and the write is retried exactly once.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use tether_bins::common::{init_logging, ConnectionArgs};
use tether_core::{FailoverConnector, FailoverError, ResilientWriter, TcpTransport};
use tracing::{error, info};

/// Send a payload with failover and a single retry
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Payload text; read from stdin when omitted
    #[arg(short, long)]
    payload: Option<String>,

    /// Set TCP_NODELAY on the connection
    #[arg(long)]
    nodelay: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.connection.log_level, args.connection.json_logs)?;

    let config = args.connection.connector_config()?;
    let payload = match args.payload {
        Some(text) => text.into_bytes(),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read payload from stdin")?;
            buf
        }
    };

    let transport = TcpTransport::new().with_nodelay(args.nodelay);
    let mut writer = ResilientWriter::new(FailoverConnector::from_config(transport, &config));

    // The initial connect is not a reconnect, so it is not subject to the gate
    let endpoint = writer.force_connect()?;
    info!("Connected to {}, sending {} bytes", endpoint, payload.len());

    if let Err(e) = writer.write(&payload) {
        match &e {
            FailoverError::WriteFailed { .. } => {
                error!("Delivery failed after one reconnect; giving up")
            }
            FailoverError::AllEndpointsUnreachable { .. } => {
                error!("Lost the connection and no endpoint answered the reconnect")
            }
            _ => {}
        }
        return Err(e.into());
    }

    info!(
        "Delivered {} bytes to {}",
        payload.len(),
        writer
            .connector()
            .active_endpoint()
            .map(ToString::to_string)
            .unwrap_or_default()
    );
    writer.disconnect();

    Ok(())
}
