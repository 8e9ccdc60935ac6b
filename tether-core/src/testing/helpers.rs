//! Test helper utilities
//!
//! Provides:
//! - `ManualClock`: a clock that only moves when told to
//! - `RecordingSink`: an event sink that keeps an owned copy of every event
//! - endpoint list builders

use crate::core::{saturating_millis, Clock, Endpoint};
use crate::monitoring::{ConnectorEvent, EventSink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Clock driven by the test
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Start at `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Move forward
    pub fn advance(&self, by: Duration) {
        self.now_ms.fetch_add(saturating_millis(by), Ordering::SeqCst);
    }

    /// Move backward (simulates a wall-clock step), saturating at zero
    pub fn rewind(&self, by: Duration) {
        let by = saturating_millis(by);
        let _ = self
            .now_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_sub(by))
            });
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Owned copy of a `ConnectorEvent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Connected(Endpoint),
    EndpointFailed(Endpoint),
    SweepExhausted(Vec<Endpoint>),
    RateLimited,
    Disconnected(Option<Endpoint>),
    DisconnectWarning(Option<Endpoint>),
    WriteRetry,
    WriteFailed,
}

impl From<&ConnectorEvent<'_>> for RecordedEvent {
    fn from(event: &ConnectorEvent<'_>) -> Self {
        match event {
            ConnectorEvent::Connected { endpoint, .. } => Self::Connected((*endpoint).clone()),
            ConnectorEvent::EndpointFailed { endpoint, .. } => {
                Self::EndpointFailed((*endpoint).clone())
            }
            ConnectorEvent::SweepExhausted { endpoints } => {
                Self::SweepExhausted(endpoints.to_vec())
            }
            ConnectorEvent::RateLimited { .. } => Self::RateLimited,
            ConnectorEvent::Disconnected { endpoint } => Self::Disconnected(endpoint.cloned()),
            ConnectorEvent::DisconnectWarning(warning) => {
                Self::DisconnectWarning(warning.endpoint.clone())
            }
            ConnectorEvent::WriteRetry { .. } => Self::WriteRetry,
            ConnectorEvent::WriteFailed { .. } => Self::WriteFailed,
        }
    }
}

/// Event sink that records everything it sees
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far, in order
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Number of events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&RecordedEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    /// Number of failed endpoint attempts
    pub fn endpoint_failures(&self) -> usize {
        self.count(|e| matches!(e, RecordedEvent::EndpointFailed(_)))
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: &ConnectorEvent<'_>) {
        self.events.lock().push(RecordedEvent::from(event));
    }
}

/// `n` distinct loopback-style endpoints: node-0:9000, node-1:9001, ...
pub fn test_endpoints(n: u16) -> Vec<Endpoint> {
    (0..n)
        .map(|i| Endpoint::new(format!("node-{}", i), 9000 + i))
        .collect()
}
