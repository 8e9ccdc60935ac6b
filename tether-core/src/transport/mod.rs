//! Transport boundary
//!
//! The connector only needs four primitives from the byte-stream layer:
//! connect with a timeout, write, flush and close. `Transport` supplies the
//! first, the `Stream` it returns supplies the rest.

pub mod tcp;

pub use tcp::{TcpStreamHandle, TcpTransport};

use crate::core::Endpoint;
use std::io::{self, Write};
use std::time::Duration;

/// A live, exclusively owned byte-stream handle
pub trait Stream: Write {
    /// Close the underlying connection
    fn close(&mut self) -> io::Result<()>;
}

/// Factory for stream handles
pub trait Transport {
    /// Handle type produced by a successful connect
    type Stream: Stream;

    /// Open a connection to `endpoint`, giving up after `timeout`
    fn connect(&mut self, endpoint: &Endpoint, timeout: Duration) -> io::Result<Self::Stream>;
}
