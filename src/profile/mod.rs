//! Tunnel profiles and config synthesis
//!
//! A profile is the flattened, validated set of fields extracted from a
//! registration response plus the locally generated keys. Synthesis maps a
//! profile into the target representations: a WireGuard INI ([`ini`]) and a
//! mihomo proxy YAML ([`yaml`]). Both serializers are pure and
//! deterministic; identical input yields byte-identical output.

pub mod endpoint;
pub mod ini;
pub mod yaml;

use base64::prelude::*;

pub use endpoint::{Endpoint, DEFAULT_ENDPOINT_PORT};

/// Default SOCKS listener bind address
pub const DEFAULT_LISTEN: &str = "127.0.0.1";

/// Default SOCKS listener port
pub const DEFAULT_LISTEN_PORT: u16 = 1080;

/// Default DNS resolvers, used when the caller supplies none
pub const DEFAULT_DNS: [&str; 2] = ["1.1.1.1", "1.0.0.1"];

/// Default tunnel MTU
pub const DEFAULT_MTU: u16 = 1280;

/// Default persistent keepalive, seconds
pub const DEFAULT_KEEPALIVE: u16 = 30;

/// Fixed port for the MASQUE proxy entry
pub const MASQUE_PORT: u16 = 443;

/// Caller-tunable synthesis knobs
#[derive(Debug, Clone)]
pub struct SynthOptions {
    /// SOCKS listener bind address
    pub listen: String,
    /// SOCKS listener port
    pub port: u16,
    /// DNS servers; replaces the default pair wholesale when set by the caller
    pub dns: Vec<String>,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            port: DEFAULT_LISTEN_PORT,
            dns: DEFAULT_DNS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Flattened WireGuard tunnel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireguardProfile {
    /// Device identifier issued by the service
    pub device_id: String,
    /// x25519 private key, base64
    pub private_key: String,
    /// Bearer token issued at registration
    pub token: String,
    /// Service-issued client identifier; feeds the reserved bytes
    pub client_id: Option<String>,
    /// Account tier tag
    pub account_type: String,
    /// Peer public key, base64
    pub peer_public_key: String,
    /// IPv4 peer endpoint
    pub endpoint: Endpoint,
    /// IPv6 peer endpoint, when assigned
    pub endpoint_v6: Option<Endpoint>,
    /// Assigned local IPv4 address, bare
    pub address_v4: String,
    /// Assigned local IPv6 address, bare
    pub address_v6: Option<String>,
    pub mtu: u16,
    pub keepalive: u16,
}

/// Flattened MASQUE tunnel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasqueProfile {
    /// Device identifier issued by the service
    pub device_id: String,
    /// SEC1 private key, base64
    pub private_key: String,
    /// Bearer token from the registration step
    pub access_token: String,
    /// Account license, when present
    pub license: Option<String>,
    /// IPv4 peer endpoint, when assigned
    pub endpoint_v4: Option<Endpoint>,
    /// IPv6 peer endpoint, when assigned
    pub endpoint_v6: Option<Endpoint>,
    /// Peer public key, PEM
    pub endpoint_public_key: String,
    /// Assigned local IPv4 address, bare
    pub address_v4: Option<String>,
    /// Assigned local IPv6 address, bare
    pub address_v6: Option<String>,
}

/// Derive the 3-byte reserved field from a base64 client identifier
///
/// The tunnel client embeds these bytes in packets for transport
/// obfuscation. Fewer than 3 decoded bytes (or undecodable input) yields no
/// reserved field rather than an error.
pub fn reserved_from_client_id(client_id: &str) -> Option<[u8; 3]> {
    let decoded = BASE64_STANDARD.decode(client_id).ok()?;
    if decoded.len() < 3 {
        return None;
    }
    Some([decoded[0], decoded[1], decoded[2]])
}

/// Drop a `/prefix` suffix from an address, if any
pub fn strip_cidr(address: &str) -> &str {
    address.split('/').next().unwrap_or(address)
}

/// Render a bare IPv4 address with an explicit `/32` prefix
pub fn with_v4_prefix(address: &str) -> String {
    format!("{}/32", strip_cidr(address))
}

/// Render a bare IPv6 address with an explicit `/128` prefix
pub fn with_v6_prefix(address: &str) -> String {
    format!("{}/128", strip_cidr(address))
}

/// Reduce a PEM-wrapped key to its base64 payload
///
/// Marker lines (`-----BEGIN …`, `-----END …`) are dropped; no further PEM
/// validation is attempted. Non-PEM input passes through joined as-is.
pub fn pem_body(pem: &str) -> String {
    pem.lines()
        .filter(|line| !line.starts_with("-----"))
        .map(str::trim)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_from_client_id() {
        // "AQID" = [1, 2, 3]
        assert_eq!(reserved_from_client_id("AQID"), Some([1, 2, 3]));
        // "/Ii9" = [252, 136, 189]
        assert_eq!(reserved_from_client_id("/Ii9"), Some([252, 136, 189]));
        // longer identifiers keep only the first three bytes
        assert_eq!(reserved_from_client_id("AQIDBAU="), Some([1, 2, 3]));
    }

    #[test]
    fn test_short_client_id_yields_no_reserved() {
        // "AQI=" decodes to 2 bytes
        assert_eq!(reserved_from_client_id("AQI="), None);
        assert_eq!(reserved_from_client_id(""), None);
        assert_eq!(reserved_from_client_id("not base64!!"), None);
    }

    #[test]
    fn test_address_prefixing() {
        assert_eq!(with_v4_prefix("10.0.0.2"), "10.0.0.2/32");
        assert_eq!(with_v4_prefix("10.0.0.2/32"), "10.0.0.2/32");
        assert_eq!(with_v6_prefix("fd01::2"), "fd01::2/128");
        assert_eq!(strip_cidr("10.0.0.2/32"), "10.0.0.2");
        assert_eq!(strip_cidr("10.0.0.2"), "10.0.0.2");
    }

    #[test]
    fn test_pem_body() {
        let pem = "-----BEGIN PUBLIC KEY-----\nMFkwEwYHKoZI\nzj0CAQYIKoZI\n-----END PUBLIC KEY-----\n";
        assert_eq!(pem_body(pem), "MFkwEwYHKoZIzj0CAQYIKoZI");

        // bare base64 passes through
        assert_eq!(pem_body("MFkwEwYHKoZI"), "MFkwEwYHKoZI");
    }
}
