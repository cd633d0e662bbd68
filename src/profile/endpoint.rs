//! Peer endpoint parsing and display
//!
//! The service hands endpoints back as `host:port` or `[ipv6]:port`, with
//! the port sometimes missing or zero. Parsing is purely structural; the
//! port default is applied by the serializers, not here.

use std::fmt;

/// Default WireGuard endpoint port, substituted for a zero or absent port
pub const DEFAULT_ENDPOINT_PORT: u16 = 2408;

/// A parsed peer endpoint
///
/// `port` is `None` when the input carried no port designator at all, which
/// is distinct from an explicitly supplied `0`; both resolve to the default
/// port at serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: Option<u16>,
}

impl Endpoint {
    /// Parse an endpoint string, splitting on the last colon outside brackets
    ///
    /// A bare IPv6 address (multiple colons, no brackets) has no port
    /// designator and parses whole as the host.
    pub fn parse(input: &str) -> Self {
        if let Some(rest) = input.strip_prefix('[') {
            if let Some(close) = rest.find(']') {
                let host = rest[..close].to_string();
                let port = rest[close + 1..]
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok());
                return Self { host, port };
            }
        }

        if input.matches(':').count() > 1 {
            // unbracketed IPv6
            return Self {
                host: input.to_string(),
                port: None,
            };
        }

        match input.rfind(':') {
            Some(idx) => Self {
                host: input[..idx].to_string(),
                port: input[idx + 1..].parse().ok(),
            },
            None => Self {
                host: input.to_string(),
                port: None,
            },
        }
    }

    /// Port with the zero/absent default applied
    pub fn resolved_port(&self) -> u16 {
        match self.port {
            None | Some(0) => DEFAULT_ENDPOINT_PORT,
            Some(port) => port,
        }
    }

    /// Endpoint string with the port default applied
    pub fn to_resolved_string(&self) -> String {
        Self {
            host: self.host.clone(),
            port: Some(self.resolved_port()),
        }
        .to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bracketed = self.host.contains(':');
        match (bracketed, self.port) {
            (true, Some(port)) => write!(f, "[{}]:{}", self.host, port),
            (true, None) => write!(f, "[{}]", self.host),
            (false, Some(port)) => write!(f, "{}:{}", self.host, port),
            (false, None) => write!(f, "{}", self.host),
        }
    }
}
