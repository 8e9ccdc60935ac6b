//! Connector configuration
//!
//! The configuration surface is deliberately small: an ordered endpoint list
//! (failover priority) and the interval gate's minimum period.
//!
//! ```json
//! {
//!   "endpoints": [
//!     { "host": "10.1.53.39", "port": 28 },
//!     { "host": "10.1.53.32", "port": 22 }
//!   ],
//!   "min_reconnect_interval_ms": 60000
//! }
//! ```

use crate::core::{saturating_millis, Endpoint};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a failover connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Endpoints in failover priority order
    pub endpoints: Vec<Endpoint>,

    /// Minimum accrued time between gated reconnects (milliseconds)
    #[serde(default = "default_min_reconnect_interval_ms")]
    pub min_reconnect_interval_ms: u64,
}

fn default_min_reconnect_interval_ms() -> u64 {
    60_000
}

impl ConnectorConfig {
    /// Configuration with the default reconnect interval
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints,
            min_reconnect_interval_ms: default_min_reconnect_interval_ms(),
        }
    }

    /// Override the reconnect interval
    pub fn with_min_reconnect_interval(mut self, interval: Duration) -> Self {
        self.min_reconnect_interval_ms = saturating_millis(interval);
        self
    }

    /// Reconnect interval as a `Duration`
    pub fn min_reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.min_reconnect_interval_ms)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: ConnectorConfig =
            serde_json::from_str(json).context("Failed to deserialize connector configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            anyhow::bail!("endpoint list must not be empty");
        }

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if endpoint.host.trim().is_empty() {
                anyhow::bail!("endpoint #{} has an empty host", index);
            }
            if endpoint.port == 0 {
                anyhow::bail!("endpoint #{} ({}) has port 0", index, endpoint.host);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_interval() {
        let cfg = ConnectorConfig::from_json_str(
            r#"{ "endpoints": [ { "host": "127.0.0.1", "port": 80 } ] }"#,
        )
        .unwrap();
        assert_eq!(cfg.min_reconnect_interval(), Duration::from_secs(60));
        assert_eq!(cfg.endpoints, vec![Endpoint::new("127.0.0.1", 80)]);
    }

    #[test]
    fn test_interval_override() {
        let cfg = ConnectorConfig::from_json_str(
            r#"{ "endpoints": [ { "host": "a", "port": 1 } ], "min_reconnect_interval_ms": 250 }"#,
        )
        .unwrap();
        assert_eq!(cfg.min_reconnect_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_validation_rejects_empty_list() {
        let err = ConnectorConfig::from_json_str(r#"{ "endpoints": [] }"#).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_validation_rejects_zero_port() {
        let cfg = ConnectorConfig::new(vec![Endpoint::new("a", 1), Endpoint::new("b", 0)]);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "endpoints": [ {{ "host": "b", "port": 2 }}, {{ "host": "a", "port": 1 }} ] }}"#
        )
        .unwrap();

        let cfg = ConnectorConfig::load(file.path()).unwrap();
        assert_eq!(cfg.endpoints[0], Endpoint::new("b", 2));
        assert_eq!(cfg.endpoints[1], Endpoint::new("a", 1));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConnectorConfig::load("/nonexistent/tether.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration file"));
    }

    #[test]
    fn test_huge_interval_saturates() {
        let cfg = ConnectorConfig::new(vec![Endpoint::new("a", 1)])
            .with_min_reconnect_interval(Duration::MAX);
        assert_eq!(cfg.min_reconnect_interval_ms, u64::MAX);
        assert_eq!(cfg.min_reconnect_interval(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_builder_roundtrip() {
        let cfg = ConnectorConfig::new(vec![Endpoint::new("a", 1)])
            .with_min_reconnect_interval(Duration::from_secs(5));
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(ConnectorConfig::from_json_str(&json).unwrap(), cfg);
    }
}
