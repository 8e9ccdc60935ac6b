//! Observability boundary
//!
//! Events are reported to an injected `EventSink`. The library never installs
//! a subscriber; binaries do that (see `tether-bins`).

pub mod events;

pub use events::{ConnectorEvent, EventSink, TracingSink};
