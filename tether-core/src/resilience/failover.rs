//! Failover connector with interval-gated reconnection
//!
//! Holds an ordered endpoint list and connects to the first reachable entry.
//! Voluntary connects are gated by an `IntervalGate` so that a degraded
//! backend is not hammered by reconnect storms; failure-triggered reconnects
//! use `force_connect` and skip the gate.
//!
//! # State Diagram
//!
//! ```text
//!   DISCONNECTED ──connect() [gate grants]──→ sweep ──first success──→ CONNECTED
//!        ▲   │                                  │                          │
//!        │   └──connect() [gate denies]──→ RateLimited                     │
//!        │                                      └──all fail──→ AllEndpointsUnreachable
//!        └──────────────────────────disconnect()───────────────────────────┘
//! ```
//!
//! Exactly one live handle exists iff the connector is connected; the handle
//! is owned here and closed before a new sweep replaces it.

use super::interval_gate::{IntervalGate, DEFAULT_MIN_PERIOD};
use crate::config::ConnectorConfig;
use crate::core::{Clock, DisconnectWarning, Endpoint, FailoverError, Result, SystemClock};
use crate::monitoring::{ConnectorEvent, EventSink, TracingSink};
use crate::transport::{Stream, Transport};
use std::sync::Arc;
use std::time::Duration;

/// Per-endpoint connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Counters for the connector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorStats {
    /// Failover sweeps started
    pub sweeps: u64,
    /// Sweeps that ended connected
    pub successful_connects: u64,
    /// Individual endpoint attempts that failed
    pub endpoint_failures: u64,
    /// Sweeps where every endpoint failed
    pub exhausted_sweeps: u64,
    /// Gated connects refused by the interval gate
    pub rate_limited: u64,
    /// Close errors swallowed during disconnect
    pub disconnect_warnings: u64,
}

/// Live handle plus the endpoint it is connected to
struct Connection<S> {
    stream: S,
    endpoint: Endpoint,
}

/// Ordered failover connector
pub struct FailoverConnector<T: Transport> {
    transport: T,
    endpoints: Vec<Endpoint>,
    gate: IntervalGate,
    connection: Option<Connection<T::Stream>>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    stats: ConnectorStats,
}

impl<T: Transport> FailoverConnector<T> {
    /// Create a connector with the default 60s reconnect interval
    pub fn new(transport: T, endpoints: Vec<Endpoint>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            transport,
            endpoints,
            gate: IntervalGate::with_clock(DEFAULT_MIN_PERIOD, Arc::clone(&clock)),
            connection: None,
            clock,
            events: Arc::new(TracingSink),
            stats: ConnectorStats::default(),
        }
    }

    /// Create a connector from validated configuration
    pub fn from_config(transport: T, config: &ConnectorConfig) -> Self {
        let mut connector = Self::new(transport, config.endpoints.clone());
        connector.set_min_reconnect_interval(config.min_reconnect_interval());
        connector
    }

    /// Report events to `events` instead of `tracing`
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Drive the interval gate from `clock`
    ///
    /// Replaces the gate, so any accrued time is discarded.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.gate = IntervalGate::with_clock(self.gate.min_period(), Arc::clone(&clock));
        self.clock = clock;
        self
    }

    /// Replace the failover list
    ///
    /// Must not be called while a connect is in flight; the live handle, if
    /// any, is kept.
    pub fn set_endpoints(&mut self, endpoints: Vec<Endpoint>) {
        self.endpoints = endpoints;
    }

    /// Replace the interval gate with a fresh one using `min_period`
    pub fn set_min_reconnect_interval(&mut self, min_period: Duration) {
        self.gate = IntervalGate::with_clock(min_period, Arc::clone(&self.clock));
    }

    /// Gated connect
    ///
    /// Fails with `RateLimited` without touching the network if the gate has
    /// not reopened.
    pub fn connect(&mut self) -> Result<Endpoint> {
        self.connect_with(false)
    }

    /// Ungated connect, used after a failure rather than as a voluntary reconnect
    pub fn force_connect(&mut self) -> Result<Endpoint> {
        self.connect_with(true)
    }

    /// Connect, consulting the gate unless `ignore_gate` is set
    ///
    /// On success returns the endpoint now held.
    pub fn connect_with(&mut self, ignore_gate: bool) -> Result<Endpoint> {
        if self.endpoints.is_empty() {
            return Err(FailoverError::NoEndpoints);
        }

        if !ignore_gate && !self.gate.is_invokable() {
            let min_period = self.gate.min_period();
            self.stats.rate_limited += 1;
            self.events
                .on_event(&ConnectorEvent::RateLimited { min_period });
            return Err(FailoverError::RateLimited { min_period });
        }

        self.sweep()
    }

    /// One failover sweep over the endpoint list, in priority order
    fn sweep(&mut self) -> Result<Endpoint> {
        // Never leave a stale handle behind when the new one overwrites it
        self.release();
        self.stats.sweeps += 1;

        let mut failed_attempts = 0;
        for endpoint in &self.endpoints {
            match self.transport.connect(endpoint, CONNECT_TIMEOUT) {
                Ok(stream) => {
                    self.stats.successful_connects += 1;
                    self.events.on_event(&ConnectorEvent::Connected {
                        endpoint,
                        failed_attempts,
                    });
                    self.connection = Some(Connection {
                        stream,
                        endpoint: endpoint.clone(),
                    });
                    return Ok(endpoint.clone());
                }
                Err(error) => {
                    failed_attempts += 1;
                    self.stats.endpoint_failures += 1;
                    self.events.on_event(&ConnectorEvent::EndpointFailed {
                        endpoint,
                        error: &error,
                    });
                }
            }
        }

        self.stats.exhausted_sweeps += 1;
        self.events.on_event(&ConnectorEvent::SweepExhausted {
            endpoints: &self.endpoints,
        });
        Err(FailoverError::AllEndpointsUnreachable {
            endpoints: self.endpoints.clone(),
        })
    }

    /// Release the live handle
    ///
    /// Close errors are reported as a `DisconnectWarning` event and
    /// swallowed. Always ends disconnected; a no-op when already disconnected.
    pub fn disconnect(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };

        if let Err(source) = connection.stream.close() {
            self.stats.disconnect_warnings += 1;
            let warning = DisconnectWarning {
                endpoint: Some(connection.endpoint.clone()),
                source,
            };
            self.events
                .on_event(&ConnectorEvent::DisconnectWarning(&warning));
        }

        self.events.on_event(&ConnectorEvent::Disconnected {
            endpoint: Some(&connection.endpoint),
        });
    }

    /// Whether a live handle is held
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Endpoint of the live handle
    pub fn active_endpoint(&self) -> Option<&Endpoint> {
        self.connection.as_ref().map(|c| &c.endpoint)
    }

    /// Failover list in priority order
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// The interval gate
    pub fn gate(&self) -> &IntervalGate {
        &self.gate
    }

    /// Connector counters
    pub fn stats(&self) -> &ConnectorStats {
        &self.stats
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn stream_mut(&mut self) -> Option<&mut T::Stream> {
        self.connection.as_mut().map(|c| &mut c.stream)
    }

    pub(crate) fn events(&self) -> &Arc<dyn EventSink> {
        &self.events
    }
}

impl<T: Transport> Drop for FailoverConnector<T> {
    fn drop(&mut self) {
        self.release();
    }
}
