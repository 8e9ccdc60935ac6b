//! Failover endpoints
//!
//! An `Endpoint` is one (host, port) candidate. A failover list is a plain
//! `Vec<Endpoint>`: insertion order is priority order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single failover candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or IP literal
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host part
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port part
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Errors from parsing `host:port` strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointParseError {
    /// No `:port` suffix
    #[error("endpoint '{0}' is missing a ':port' suffix")]
    MissingPort(String),

    /// Host part is empty
    #[error("endpoint '{0}' has an empty host")]
    EmptyHost(String),

    /// Port is not a valid u16
    #[error("endpoint '{input}' has an invalid port '{port}'")]
    InvalidPort {
        /// The full item that failed
        input: String,
        /// The offending port text
        port: String,
    },

    /// List contained no endpoints at all
    #[error("endpoint list is empty")]
    EmptyList,
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        // Bracketed IPv6 literal: [::1]:8080
        let (host, port) = if let Some(rest) = input.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| EndpointParseError::MissingPort(input.to_string()))?;
            let port = tail
                .strip_prefix(':')
                .ok_or_else(|| EndpointParseError::MissingPort(input.to_string()))?;
            (host, port)
        } else {
            input
                .rsplit_once(':')
                .ok_or_else(|| EndpointParseError::MissingPort(input.to_string()))?
        };

        if host.is_empty() {
            return Err(EndpointParseError::EmptyHost(input.to_string()));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| EndpointParseError::InvalidPort {
                input: input.to_string(),
                port: port.to_string(),
            })?;

        Ok(Endpoint::new(host, port))
    }
}

/// Parse a comma-separated failover list (`"a:1,b:2"`) in priority order
///
/// Whitespace around items and empty items are ignored.
pub fn parse_endpoint_list(list: &str) -> Result<Vec<Endpoint>, EndpointParseError> {
    let endpoints = list
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(Endpoint::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    if endpoints.is_empty() {
        return Err(EndpointParseError::EmptyList);
    }

    Ok(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_port() {
        let endpoint: Endpoint = "10.1.53.39:28".parse().unwrap();
        assert_eq!(endpoint, Endpoint::new("10.1.53.39", 28));
        assert_eq!(endpoint.to_string(), "10.1.53.39:28");
    }

    #[test]
    fn test_parse_ipv6_literal() {
        let endpoint: Endpoint = "[::1]:8080".parse().unwrap();
        assert_eq!(endpoint.host(), "::1");
        assert_eq!(endpoint.port(), 8080);
        assert_eq!(endpoint.to_string(), "[::1]:8080");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            "localhost".parse::<Endpoint>(),
            Err(EndpointParseError::MissingPort("localhost".to_string()))
        );
        assert_eq!(
            ":80".parse::<Endpoint>(),
            Err(EndpointParseError::EmptyHost(":80".to_string()))
        );
        assert!(matches!(
            "host:99999".parse::<Endpoint>(),
            Err(EndpointParseError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_parse_list_keeps_priority_order() {
        let list = parse_endpoint_list(" a:1, b:2 ,,c:3 ").unwrap();
        let hosts: Vec<&str> = list.iter().map(Endpoint::host).collect();
        assert_eq!(hosts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_list_empty() {
        assert_eq!(parse_endpoint_list(" , "), Err(EndpointParseError::EmptyList));
    }

    #[test]
    fn test_serde_shape() {
        let endpoint = Endpoint::new("127.0.0.1", 80);
        let json = serde_json::to_string(&endpoint).unwrap();
        assert_eq!(json, r#"{"host":"127.0.0.1","port":80}"#);
    }
}
