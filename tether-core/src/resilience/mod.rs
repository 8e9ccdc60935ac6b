//! Resilience patterns for point-to-point delivery
//!
//! Provides the reconnect machinery:
//! - Interval gate limiting voluntary reconnects
//! - Ordered failover sweep over the endpoint list
//! - Resilient write with exactly one reconnect-and-retry cycle

pub mod failover;
pub mod interval_gate;
pub mod writer;

pub use failover::{ConnectorStats, FailoverConnector, CONNECT_TIMEOUT};
pub use interval_gate::{IntervalGate, DEFAULT_MIN_PERIOD};
pub use writer::{ResilientWriter, SharedWriter, WriteStats};
