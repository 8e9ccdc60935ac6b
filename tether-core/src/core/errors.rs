//! Domain-specific error types for connect and write operations
//!
//! Every failure a caller can observe is a distinct variant, so callers can
//! branch on the kind of failure instead of inspecting messages.

use super::endpoint::Endpoint;
use std::io;
use std::time::Duration;

/// Errors surfaced by the connector and the resilient writer
#[derive(Debug, thiserror::Error)]
pub enum FailoverError {
    /// A gated connect was requested before the interval gate reopened
    #[error("connect too fast: reconnects are limited to one per {min_period:?}")]
    RateLimited {
        /// Minimum period configured on the gate
        min_period: Duration,
    },

    /// Every endpoint in one failover sweep failed or timed out
    #[error("all connections failed, endpoints: {}", format_endpoints(.endpoints))]
    AllEndpointsUnreachable {
        /// The full list that was attempted, in priority order
        endpoints: Vec<Endpoint>,
    },

    /// Payload delivery failed even after the retry cycle
    #[error("write failed after reconnect: {source}")]
    WriteFailed {
        /// I/O error from the retried write
        #[source]
        source: io::Error,
    },

    /// Connect was invoked with an empty endpoint list
    #[error("no endpoints configured")]
    NoEndpoints,
}

impl FailoverError {
    /// Whether a later gated connect may succeed without any change by the caller
    pub fn is_transient(&self) -> bool {
        !matches!(self, FailoverError::NoEndpoints)
    }
}

/// Closing the transport raised an error; always non-fatal
///
/// Never returned from an operation, only reported to the event sink.
#[derive(Debug, thiserror::Error)]
#[error("disconnect failed: {source}")]
pub struct DisconnectWarning {
    /// Endpoint the closed handle was connected to
    pub endpoint: Option<Endpoint>,
    /// Error raised by close
    #[source]
    pub source: io::Error,
}

/// Result type for connector and writer operations
pub type Result<T> = std::result::Result<T, FailoverError>;

fn format_endpoints(endpoints: &[Endpoint]) -> String {
    let items: Vec<String> = endpoints.iter().map(Endpoint::to_string).collect();
    format!("[{}]", items.join(", "))
}
