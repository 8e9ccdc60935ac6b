//! Testing utilities and doubles for integration tests
//!
//! Provides mock implementations and test helpers for:
//! - MockTransport: scripted reachability, write and close failures
//! - ManualClock: deterministic time for the interval gate
//! - RecordingSink: captures connector events for assertions

pub mod helpers;
pub mod mock_transport;

pub use helpers::{test_endpoints, ManualClock, RecordedEvent, RecordingSink};
pub use mock_transport::{MockStream, MockTransport};
