//! Connection probe
//!
//! Repeatedly performs a gated connect followed by a disconnect, sleeping
//! between rounds. Useful for watching failover order and the reconnect
//! interval gate against a live set of endpoints.

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tether_bins::common::{init_logging, ConnectionArgs};
use tether_core::{FailoverConnector, FailoverError, TcpTransport};
use tracing::{info, warn};

/// Probe a failover list with gated connects
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Number of connect/disconnect rounds
    #[arg(short, long, default_value = "100")]
    rounds: u64,

    /// Sleep between rounds, in milliseconds
    #[arg(long, default_value = "1000")]
    pause_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.connection.log_level, args.connection.json_logs)?;

    let config = args.connection.connector_config()?;
    let mut connector = FailoverConnector::from_config(TcpTransport::new(), &config);

    let running = Arc::new(AtomicBool::new(true));
    let running_ctrlc = Arc::clone(&running);
    ctrlc::set_handler(move || {
        warn!("Received Ctrl+C, stopping probe...");
        running_ctrlc.store(false, Ordering::SeqCst);
    })?;

    info!(
        "Probing {} endpoint(s), min reconnect interval {:?}",
        config.endpoints.len(),
        config.min_reconnect_interval()
    );

    let mut granted = 0u64;
    let mut refused = 0u64;
    let mut unreachable = 0u64;

    for round in 1..=args.rounds {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        match connector.connect() {
            Ok(endpoint) => {
                granted += 1;
                info!("round {}: connected to {}", round, endpoint);
            }
            Err(FailoverError::RateLimited { .. }) => refused += 1,
            Err(e @ FailoverError::AllEndpointsUnreachable { .. }) => {
                unreachable += 1;
                warn!("round {}: {}", round, e);
            }
            Err(e) => return Err(e.into()),
        }
        connector.disconnect();

        std::thread::sleep(Duration::from_millis(args.pause_ms));
    }

    let stats = connector.stats();
    info!("=== Probe Summary ===");
    info!("Connected: {}", granted);
    info!("Rate limited: {}", refused);
    info!("Unreachable sweeps: {}", unreachable);
    info!("Endpoint failures: {}", stats.endpoint_failures);
    info!("Disconnect warnings: {}", stats.disconnect_warnings);

    Ok(())
}
