//! Tether Core - Resilient Point-to-Point Byte-Stream Client
//!
//! Tether connects to the first reachable endpoint of an ordered failover list
//! and delivers payloads with a single self-healing retry across a reconnect.
//!
//! ## Architecture
//! - **Interval gate**: cumulative-timer rate gate for voluntary reconnects
//! - **Failover connector**: strict priority-order sweep over the endpoint list
//! - **Resilient writer**: one disconnect + ungated reconnect + rewrite on failure
//! - **Injected collaborators**: transport, clock and event sink are passed in,
//!   no process-wide state
//!
//! ## Core Modules
//! - `core`: Endpoint, Clock, error types
//! - `resilience`: IntervalGate, FailoverConnector, ResilientWriter
//! - `transport`: Transport/Stream traits and the TCP implementation
//! - `monitoring`: connector events and the tracing-backed sink
//! - `config`: serde-backed connector configuration
//! - `testing`: scripted transport, manual clock, recording sink (behind the
//!   `testing` feature)
//!
//! ## Usage
//!
//! ```no_run
//! use tether_core::prelude::*;
//!
//! let endpoints = parse_endpoint_list("10.0.0.1:9000,10.0.0.2:9000")?;
//! let connector = FailoverConnector::new(TcpTransport::new(), endpoints);
//! let mut writer = ResilientWriter::new(connector);
//!
//! // The gate never grants its first poll, so open the link unconditionally
//! writer.force_connect()?;
//! writer.write(b"hello")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod monitoring;
pub mod resilience;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

// Re-export core types
pub use crate::core::{
    parse_endpoint_list, Clock, DisconnectWarning, Endpoint, FailoverError, Result, SystemClock,
};

// Re-export resilience types
pub use crate::resilience::{
    ConnectorStats, FailoverConnector, IntervalGate, ResilientWriter, SharedWriter, WriteStats,
    CONNECT_TIMEOUT, DEFAULT_MIN_PERIOD,
};

pub use config::ConnectorConfig;
pub use monitoring::{ConnectorEvent, EventSink, TracingSink};
pub use transport::{Stream, TcpTransport, Transport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::ConnectorConfig;
    pub use crate::core::{parse_endpoint_list, Endpoint, FailoverError, Result};
    pub use crate::resilience::{FailoverConnector, IntervalGate, ResilientWriter};
    pub use crate::transport::{TcpTransport, Transport};
}
