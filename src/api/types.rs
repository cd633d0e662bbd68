//! Registration API wire types

use serde::{Deserialize, Serialize};

use super::tos_timestamp;

/// Device registration request body (`POST /reg`)
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub key: String,
    pub install_id: String,
    pub fcm_token: String,
    pub tos: String,
    pub model: String,
    pub serial_number: String,
    pub os_version: String,
    pub key_type: String,
    pub tunnel_type: String,
    pub locale: String,
}

impl Registration {
    /// Build a registration payload with the current TOS timestamp and the
    /// empty install/FCM/OS fields the service expects from a fresh device.
    pub fn new(
        key: &str,
        serial: &str,
        key_type: &str,
        tunnel_type: &str,
        model: &str,
        locale: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            install_id: String::new(),
            fcm_token: String::new(),
            tos: tos_timestamp(),
            model: model.to_string(),
            serial_number: serial.to_string(),
            os_version: String::new(),
            key_type: key_type.to_string(),
            tunnel_type: tunnel_type.to_string(),
            locale: locale.to_string(),
        }
    }
}

/// Key enrollment request body (`PATCH /reg/{id}`)
#[derive(Debug, Clone, Serialize)]
pub struct DeviceUpdate {
    pub key: String,
    pub key_type: String,
    pub tunnel_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Registration response: the device identity the service created
///
/// Immutable once received; the pipeline only reads from it.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    pub id: String,
    #[serde(default)]
    pub account: Account,
    #[serde(default)]
    pub config: AccountConfig,
    #[serde(default)]
    pub token: Option<String>,
}

/// Account descriptor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub license: Option<String>,
}

/// Assigned device configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub peers: Vec<Peer>,
    #[serde(default)]
    pub interface: Option<InterfaceConfig>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Tunnel peer assigned by the service
#[derive(Debug, Clone, Deserialize)]
pub struct Peer {
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub endpoint: Option<PeerEndpoint>,
}

/// Peer endpoint, per address family
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeerEndpoint {
    #[serde(default)]
    pub v4: Option<String>,
    #[serde(default)]
    pub v6: Option<String>,
}

/// Interface block of the assigned configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceConfig {
    #[serde(default)]
    pub addresses: Option<Addresses>,
}

/// Assigned local addresses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Addresses {
    #[serde(default)]
    pub v4: Option<String>,
    #[serde(default)]
    pub v6: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_serializes_all_fields() {
        let reg = Registration::new(
            "cHVia2V5",
            "a1b2c3d4e5f60708",
            "curve25519",
            "wireguard",
            "PC",
            "en_US",
        );
        let json = serde_json::to_value(&reg).unwrap();

        assert_eq!(json["key"], "cHVia2V5");
        assert_eq!(json["install_id"], "");
        assert_eq!(json["fcm_token"], "");
        assert_eq!(json["os_version"], "");
        assert_eq!(json["key_type"], "curve25519");
        assert_eq!(json["tunnel_type"], "wireguard");
        assert_eq!(json["serial_number"], "a1b2c3d4e5f60708");
        assert!(json["tos"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_device_update_omits_absent_name() {
        let update = DeviceUpdate {
            key: "ZGVy".into(),
            key_type: "secp256r1".into(),
            tunnel_type: "masque".into(),
            name: None,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(!json.contains("name"));
    }

    #[test]
    fn test_account_data_tolerates_sparse_response() {
        // Only the id is guaranteed; everything else may be absent
        let account: AccountData = serde_json::from_str(r#"{"id": "dev-1"}"#).unwrap();
        assert_eq!(account.id, "dev-1");
        assert!(account.token.is_none());
        assert!(account.account.license.is_none());
        assert!(account.config.peers.is_empty());
        assert!(account.config.interface.is_none());
        assert!(account.config.client_id.is_none());
    }
}
