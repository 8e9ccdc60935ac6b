//! TCP transport over `std::net`

use super::{Stream, Transport};
use crate::core::Endpoint;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use tracing::debug;

/// Blocking TCP transport
#[derive(Debug, Clone, Default)]
pub struct TcpTransport {
    nodelay: bool,
    write_timeout: Option<Duration>,
}

impl TcpTransport {
    /// Create a transport with OS defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set TCP_NODELAY on every new stream
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Bound each write call
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    fn resolve(endpoint: &Endpoint) -> io::Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (endpoint.host(), endpoint.port())
            .to_socket_addrs()?
            .collect();
        if addrs.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} did not resolve to any address", endpoint),
            ));
        }
        Ok(addrs)
    }
}

impl Transport for TcpTransport {
    type Stream = TcpStreamHandle;

    fn connect(&mut self, endpoint: &Endpoint, timeout: Duration) -> io::Result<Self::Stream> {
        let addrs = Self::resolve(endpoint)?;

        connect_within(&addrs, timeout, |addr, budget| {
            let stream = TcpStream::connect_timeout(addr, budget)?;
            stream.set_nodelay(self.nodelay)?;
            stream.set_write_timeout(self.write_timeout)?;
            debug!("TCP connected to {} ({})", endpoint, addr);
            Ok(TcpStreamHandle { stream })
        })
        .map_err(|e| {
            debug!("TCP connect to {} failed: {}", endpoint, e);
            e
        })
    }
}

/// Try `addrs` in order until one connects, sharing a single `timeout`
///
/// Each attempt gets whatever is left of the budget; once it is spent the
/// remaining addresses are skipped with `TimedOut`. A failure anywhere in
/// `attempt` (including socket setup after the connect) moves on to the next
/// address.
fn connect_within<S, F>(addrs: &[SocketAddr], timeout: Duration, mut attempt: F) -> io::Result<S>
where
    F: FnMut(&SocketAddr, Duration) -> io::Result<S>,
{
    let deadline = Instant::now() + timeout;
    let mut last_error = None;

    for addr in addrs {
        let budget = deadline.saturating_duration_since(Instant::now());
        if budget.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", timeout),
            ));
        }

        match attempt(addr, budget) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!("TCP connect to {} failed: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotConnected, "no address to connect to")
    }))
}

/// Live TCP connection
#[derive(Debug)]
pub struct TcpStreamHandle {
    stream: TcpStream,
}

impl TcpStreamHandle {
    /// Local address of the connection
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    /// Remote address of the connection
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }
}

impl Write for TcpStreamHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Stream for TcpStreamHandle {
    fn close(&mut self) -> io::Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            // Peer already tore the connection down
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn addrs(n: u16) -> Vec<SocketAddr> {
        (0..n)
            .map(|i| SocketAddr::from(([127, 0, 0, 1], 20_000 + i)))
            .collect()
    }

    fn timed_out() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "scripted timeout")
    }

    #[test]
    fn test_addresses_share_one_timeout() {
        let timeout = Duration::from_millis(80);
        let mut budgets = Vec::new();
        let start = Instant::now();

        let result: io::Result<()> = connect_within(&addrs(4), timeout, |_, budget| {
            budgets.push(budget);
            // Every address hangs for its whole budget
            thread::sleep(budget);
            Err(timed_out())
        });

        let elapsed = start.elapsed();
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::TimedOut);
        assert!(
            elapsed < timeout + Duration::from_millis(60),
            "endpoint took {:?} with a {:?} timeout",
            elapsed,
            timeout
        );
        assert!(budgets.iter().all(|b| *b <= timeout));
        // The first address used up the budget, later ones were never tried
        assert_eq!(budgets.len(), 1);
    }

    #[test]
    fn test_fast_failures_fall_through_to_next_address() {
        let mut tried = Vec::new();

        let result = connect_within(&addrs(3), Duration::from_secs(5), |addr, _| {
            tried.push(*addr);
            if tried.len() < 3 {
                Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
            } else {
                Ok(addr.port())
            }
        });

        assert_eq!(result.unwrap(), 20_002);
        assert_eq!(tried, addrs(3));
    }

    #[test]
    fn test_setup_failure_moves_to_next_address() {
        let mut calls = 0;

        let result = connect_within(&addrs(2), Duration::from_secs(5), |addr, _| {
            calls += 1;
            if calls == 1 {
                // Connected, but configuring the socket failed
                Err(io::Error::new(io::ErrorKind::InvalidInput, "setsockopt failed"))
            } else {
                Ok(*addr)
            }
        });

        assert_eq!(result.unwrap(), addrs(2)[1]);
    }
}
