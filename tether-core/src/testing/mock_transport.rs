//! Scripted transport for testing
//!
//! `MockTransport` is a cheap handle onto shared state: clone it before
//! handing it to a connector and keep the clone to script reachability and
//! failures and to inspect what happened.

use crate::core::Endpoint;
use crate::transport::{Stream, Transport};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    reachable: HashSet<Endpoint>,
    connect_attempts: Vec<Endpoint>,
    write_failures_remaining: usize,
    fail_close: bool,
    delivered: Vec<Vec<u8>>,
    delivered_to: Vec<Endpoint>,
    open_streams: usize,
    close_count: usize,
    last_timeout: Option<Duration>,
}

/// Programmable transport double
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a transport where nothing is reachable
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport where exactly `endpoints` are reachable
    pub fn with_reachable(endpoints: &[Endpoint]) -> Self {
        let transport = Self::new();
        for endpoint in endpoints {
            transport.set_reachable(endpoint, true);
        }
        transport
    }

    /// Make `endpoint` accept or refuse connections
    pub fn set_reachable(&self, endpoint: &Endpoint, reachable: bool) {
        let mut state = self.state.lock();
        if reachable {
            state.reachable.insert(endpoint.clone());
        } else {
            state.reachable.remove(endpoint);
        }
    }

    /// Fail the next `n` write calls on any stream
    pub fn fail_next_writes(&self, n: usize) {
        self.state.lock().write_failures_remaining = n;
    }

    /// Make every close return an error
    pub fn fail_close(&self, fail: bool) {
        self.state.lock().fail_close = fail;
    }

    /// Every endpoint a connect was attempted on, in order
    pub fn connect_attempts(&self) -> Vec<Endpoint> {
        self.state.lock().connect_attempts.clone()
    }

    /// Payloads that were written and flushed, in order
    pub fn delivered(&self) -> Vec<Vec<u8>> {
        self.state.lock().delivered.clone()
    }

    /// Endpoint each delivered payload went to
    pub fn delivered_to(&self) -> Vec<Endpoint> {
        self.state.lock().delivered_to.clone()
    }

    /// Streams created and not yet closed or dropped
    pub fn open_streams(&self) -> usize {
        self.state.lock().open_streams
    }

    /// Number of close calls
    pub fn close_count(&self) -> usize {
        self.state.lock().close_count
    }

    /// Timeout passed to the most recent connect
    pub fn last_timeout(&self) -> Option<Duration> {
        self.state.lock().last_timeout
    }
}

impl Transport for MockTransport {
    type Stream = MockStream;

    fn connect(&mut self, endpoint: &Endpoint, timeout: Duration) -> io::Result<MockStream> {
        let mut state = self.state.lock();
        state.connect_attempts.push(endpoint.clone());
        state.last_timeout = Some(timeout);

        if !state.reachable.contains(endpoint) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("{} refused the connection", endpoint),
            ));
        }

        state.open_streams += 1;
        Ok(MockStream {
            state: Arc::clone(&self.state),
            endpoint: endpoint.clone(),
            pending: Vec::new(),
            closed: false,
        })
    }
}

/// Stream handed out by `MockTransport`
#[derive(Debug)]
pub struct MockStream {
    state: Arc<Mutex<MockState>>,
    endpoint: Endpoint,
    pending: Vec<u8>,
    closed: bool,
}

impl MockStream {
    fn mark_closed(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.lock().open_streams -= 1;
        }
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.write_failures_remaining > 0 {
            state.write_failures_remaining -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted write failure"));
        }
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let payload = std::mem::take(&mut self.pending);
            let mut state = self.state.lock();
            state.delivered.push(payload);
            state.delivered_to.push(self.endpoint.clone());
        }
        Ok(())
    }
}

impl Stream for MockStream {
    fn close(&mut self) -> io::Result<()> {
        self.mark_closed();
        let mut state = self.state.lock();
        state.close_count += 1;
        if state.fail_close {
            return Err(io::Error::new(io::ErrorKind::Other, "scripted close failure"));
        }
        Ok(())
    }
}

impl Drop for MockStream {
    fn drop(&mut self) {
        self.mark_closed();
    }
}
