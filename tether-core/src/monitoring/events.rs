//! Connector events and the injected logging collaborator
//!
//! The connector and writer never log through a global logger directly.
//! They report `ConnectorEvent`s to an `EventSink` handed to them at
//! construction; `TracingSink` is the default and forwards to `tracing`.

use crate::core::{DisconnectWarning, Endpoint};
use std::io;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Something observable happened inside the connector or writer
#[derive(Debug)]
pub enum ConnectorEvent<'a> {
    /// A sweep reached an endpoint
    Connected {
        /// The endpoint now held
        endpoint: &'a Endpoint,
        /// Failed attempts before this one, in the same sweep
        failed_attempts: usize,
    },

    /// One endpoint in a sweep could not be reached
    EndpointFailed {
        /// The endpoint that failed
        endpoint: &'a Endpoint,
        /// Transport error
        error: &'a io::Error,
    },

    /// Every endpoint in a sweep failed
    SweepExhausted {
        /// Full list that was attempted
        endpoints: &'a [Endpoint],
    },

    /// A gated connect was refused by the interval gate
    RateLimited {
        /// Gate period
        min_period: Duration,
    },

    /// The live handle was released
    Disconnected {
        /// Endpoint the handle belonged to
        endpoint: Option<&'a Endpoint>,
    },

    /// Closing the handle failed (non-fatal)
    DisconnectWarning(&'a DisconnectWarning),

    /// First write attempt failed, reconnecting for the single retry
    WriteRetry {
        /// Error from the first attempt
        error: &'a io::Error,
    },

    /// The retried write failed too
    WriteFailed {
        /// Error from the retried attempt
        error: &'a io::Error,
    },
}

/// Receiver for connector events
pub trait EventSink: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &ConnectorEvent<'_>);
}

/// Default sink: forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: &ConnectorEvent<'_>) {
        match event {
            ConnectorEvent::Connected {
                endpoint,
                failed_attempts,
            } => {
                info!(
                    "Connected to {} ({} endpoint(s) failed before it)",
                    endpoint, failed_attempts
                );
            }
            ConnectorEvent::EndpointFailed { endpoint, error } => {
                info!("connection failed, endpoint: {} ({})", endpoint, error);
            }
            ConnectorEvent::SweepExhausted { endpoints } => {
                let list: Vec<String> = endpoints.iter().map(Endpoint::to_string).collect();
                error!("all connections failed, endpoints: [{}]", list.join(", "));
            }
            ConnectorEvent::RateLimited { min_period } => {
                error!("connect too fast (min interval {:?})", min_period);
            }
            ConnectorEvent::Disconnected { endpoint } => match endpoint {
                Some(endpoint) => debug!("Disconnected from {}", endpoint),
                None => debug!("Disconnected"),
            },
            ConnectorEvent::DisconnectWarning(warning) => {
                warn!("{}", warning);
            }
            ConnectorEvent::WriteRetry { error } => {
                warn!("first write failed ({}), reconnecting for a second try", error);
            }
            ConnectorEvent::WriteFailed { error } => {
                error!("write failed after reconnect: {}", error);
            }
        }
    }
}
