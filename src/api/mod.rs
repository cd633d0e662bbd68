//! Registration service client
//!
//! Talks JSON over HTTPS to the WARP registration API. The service is a
//! black box reachable via a base URL plus a fixed API version path segment;
//! both are carried in [`ApiSettings`] so tests can point the client
//! elsewhere without process-wide state.

pub mod client;
pub mod types;

use std::time::Duration;

pub use client::RegistrationClient;
pub use types::{AccountData, DeviceUpdate, Registration};

/// Production API base URL
pub const API_BASE: &str = "https://api.cloudflareclient.com";

/// API version path segment
pub const API_VERSION: &str = "v0a4471";

/// Client version identification sent on every request
pub const CLIENT_VERSION: &str = "a-6.35-4471";

/// User agent sent on every request
pub const USER_AGENT: &str = "WARP for Android";

/// Key/tunnel type tags for the WireGuard path
pub const KEY_TYPE_WIREGUARD: &str = "curve25519";
pub const TUNNEL_TYPE_WIREGUARD: &str = "wireguard";

/// Key/tunnel type tags for the MASQUE path
pub const KEY_TYPE_MASQUE: &str = "secp256r1";
pub const TUNNEL_TYPE_MASQUE: &str = "masque";

/// Request timeout applied to every API call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the registration service
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Scheme + host, no trailing slash
    pub base_url: String,
    /// Version path segment between host and `/reg`
    pub version: String,
    /// Per-request deadline
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            version: API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Current local time as `YYYY-MM-DDTHH:mm:ss.sss±HH:mm`
///
/// The service expects the TOS acceptance timestamp in local time with a
/// numeric UTC offset, not in Zulu form.
pub fn tos_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ApiSettings::default();
        assert_eq!(settings.base_url, API_BASE);
        assert_eq!(settings.version, API_VERSION);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_tos_timestamp_shape() {
        let ts = tos_timestamp();

        // 2026-08-28T14:03:07.123+02:00 — 29 chars, offset separated by ':'
        assert_eq!(ts.len(), 29);
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
        assert!(ts.ends_with(|c: char| c.is_ascii_digit()));
        assert_eq!(&ts[26..27], ":");
        let offset_sign = &ts[23..24];
        assert!(offset_sign == "+" || offset_sign == "-");
    }
}
