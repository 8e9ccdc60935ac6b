//! Core value types shared by every layer
//!
//! - `Endpoint`: one (host, port) failover candidate
//! - `Clock`: time source for the interval gate
//! - `FailoverError`: typed failures surfaced to callers

pub mod clock;
pub mod endpoint;
pub mod errors;

pub use clock::{Clock, SystemClock};
pub(crate) use clock::saturating_millis;
pub use endpoint::{parse_endpoint_list, Endpoint, EndpointParseError};
pub use errors::{DisconnectWarning, FailoverError, Result};
