//! Common utilities for all binaries
//!
//! Shared initialization, CLI parsing, and setup code.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tether_core::{parse_endpoint_list, ConnectorConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Connection arguments shared by all binaries
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Comma-separated failover list in priority order, e.g. "10.0.0.1:9000,10.0.0.2:9000"
    #[arg(long, conflicts_with = "config")]
    pub hosts: Option<String>,

    /// JSON configuration file (endpoints + min_reconnect_interval_ms)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum accrued time between gated reconnects, in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl ConnectionArgs {
    /// Build and validate the connector configuration from the arguments
    pub fn connector_config(&self) -> Result<ConnectorConfig> {
        let mut config = match (&self.hosts, &self.config) {
            (Some(hosts), _) => {
                let endpoints = parse_endpoint_list(hosts)
                    .with_context(|| format!("Invalid --hosts value '{}'", hosts))?;
                ConnectorConfig::new(endpoints)
            }
            (None, Some(path)) => ConnectorConfig::load(path)?,
            (None, None) => anyhow::bail!("either --hosts or --config is required"),
        };

        if let Some(interval_ms) = self.interval_ms {
            config.min_reconnect_interval_ms = interval_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Initialize tracing/logging
pub fn init_logging(level: &str, json_logs: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    if json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}
