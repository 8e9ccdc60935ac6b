//! Resilient writer with a single self-healing retry
//!
//! Delivers a payload over the connector's live handle. On an I/O failure it
//! performs exactly one disconnect + ungated reconnect + rewrite cycle before
//! giving up with `WriteFailed`.
//!
//! ```text
//! write(payload)
//!   ├─ not connected? → connect() (gated; RateLimited / AllEndpointsUnreachable propagate)
//!   ├─ atomic write ──ok──→ done
//!   └─ failed → disconnect() → force_connect() → atomic write ──ok──→ done
//!                                                     └─failed──→ WriteFailed (still connected)
//! ```
//!
//! An atomic write is one `write_all` of the full payload followed by one
//! `flush`.

use super::failover::FailoverConnector;
use crate::core::{Endpoint, FailoverError, Result};
use crate::monitoring::ConnectorEvent;
use crate::transport::Transport;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Writer behind an explicit mutual-exclusion boundary
pub type SharedWriter<T> = Arc<Mutex<ResilientWriter<T>>>;

/// Counters for the writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Calls to `write`
    pub writes: u64,
    /// Writes that needed the reconnect-and-retry cycle
    pub retries: u64,
    /// Writes that ended in an error
    pub failures: u64,
    /// Payload bytes delivered (flushed) successfully
    pub bytes_delivered: u64,
}

/// Resilient writer built on a failover connector
///
/// Not internally synchronized; wrap it with `into_shared` when several
/// threads need to write.
pub struct ResilientWriter<T: Transport> {
    connector: FailoverConnector<T>,
    stats: WriteStats,
}

impl<T: Transport> ResilientWriter<T> {
    /// Wrap a connector
    pub fn new(connector: FailoverConnector<T>) -> Self {
        Self {
            connector,
            stats: WriteStats::default(),
        }
    }

    /// Deliver `payload`, retrying once across a reconnect
    ///
    /// If the retried write fails the writer is still connected to the
    /// endpoint the retry reconnected to.
    pub fn write(&mut self, payload: &[u8]) -> Result<()> {
        self.stats.writes += 1;
        let result = self.write_inner(payload);

        match &result {
            Ok(()) => self.stats.bytes_delivered += payload.len() as u64,
            Err(_) => self.stats.failures += 1,
        }
        result
    }

    fn write_inner(&mut self, payload: &[u8]) -> Result<()> {
        if !self.connector.is_connected() {
            self.connector.connect()?;
        }

        let error = match self.atomic_write(payload) {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };

        self.stats.retries += 1;
        self.connector
            .events()
            .on_event(&ConnectorEvent::WriteRetry { error: &error });

        // Failure-triggered reconnect, not a voluntary one: skip the gate
        self.connector.disconnect();
        self.connector.force_connect()?;

        self.atomic_write(payload).map_err(|source| {
            self.connector
                .events()
                .on_event(&ConnectorEvent::WriteFailed { error: &source });
            FailoverError::WriteFailed { source }
        })
    }

    fn atomic_write(&mut self, payload: &[u8]) -> io::Result<()> {
        let stream = self
            .connector
            .stream_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no live connection"))?;
        stream.write_all(payload)?;
        stream.flush()
    }

    /// Gated connect
    pub fn connect(&mut self) -> Result<Endpoint> {
        self.connector.connect()
    }

    /// Ungated connect
    pub fn force_connect(&mut self) -> Result<Endpoint> {
        self.connector.force_connect()
    }

    /// Release the live handle
    pub fn disconnect(&mut self) {
        self.connector.disconnect();
    }

    /// Whether a live handle is held
    pub fn is_connected(&self) -> bool {
        self.connector.is_connected()
    }

    /// The underlying connector
    pub fn connector(&self) -> &FailoverConnector<T> {
        &self.connector
    }

    /// The underlying connector, mutably
    pub fn connector_mut(&mut self) -> &mut FailoverConnector<T> {
        &mut self.connector
    }

    /// Writer counters
    pub fn stats(&self) -> &WriteStats {
        &self.stats
    }

    /// Unwrap the connector
    pub fn into_inner(self) -> FailoverConnector<T> {
        self.connector
    }

    /// Move the writer behind an `Arc<Mutex<_>>`
    pub fn into_shared(self) -> SharedWriter<T> {
        Arc::new(Mutex::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[test]
    fn test_write_stats() {
        let endpoint = Endpoint::new("127.0.0.1", 7000);
        let transport = MockTransport::new();
        transport.set_reachable(&endpoint, true);
        transport.fail_next_writes(1);

        let connector = FailoverConnector::new(transport.clone(), vec![endpoint]);
        let mut writer = ResilientWriter::new(connector);
        writer.force_connect().unwrap();

        writer.write(b"abc").unwrap();
        writer.write(b"de").unwrap();

        assert_eq!(
            writer.stats(),
            &WriteStats {
                writes: 2,
                retries: 1,
                failures: 0,
                bytes_delivered: 5,
            }
        );
        assert_eq!(transport.delivered(), vec![b"abc".to_vec(), b"de".to_vec()]);
    }

    #[test]
    fn test_into_inner_keeps_connection() {
        let endpoint = Endpoint::new("127.0.0.1", 7000);
        let transport = MockTransport::new();
        transport.set_reachable(&endpoint, true);

        let mut writer =
            ResilientWriter::new(FailoverConnector::new(transport, vec![endpoint.clone()]));
        writer.force_connect().unwrap();

        let connector = writer.into_inner();
        assert_eq!(connector.active_endpoint(), Some(&endpoint));
    }
}
