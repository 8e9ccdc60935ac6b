//! Tether command-line tools
//!
//! - `tether-send`: deliver one payload through the failover list
//! - `tether-probe`: repeatedly connect/disconnect to watch failover and gating

pub mod common;
