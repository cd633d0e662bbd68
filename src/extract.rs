//! Response extraction and validation
//!
//! Flattens a registration response plus the locally generated keys into a
//! tunnel profile. Extraction is purely structural: it checks that required
//! fields exist and carries optionals through as absent, but applies no
//! defaulting policy; that belongs to the synthesizers.

use crate::api::types::AccountData;
use crate::error::ValidationError;
use crate::keys::{MasqueKeyPair, WireguardKeyPair};
use crate::profile::{
    Endpoint, MasqueProfile, WireguardProfile, DEFAULT_KEEPALIVE, DEFAULT_MTU,
};

/// Account tier tag emitted into the WireGuard profile
const ACCOUNT_TYPE_FREE: &str = "free";

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Build a WireGuard profile from a registration response
///
/// Requires a bearer token, a peer with a public key and an IPv4 endpoint,
/// and an assigned IPv4 address. IPv6 endpoint/address and the client
/// identifier are optional.
///
/// # Errors
///
/// A distinct `ValidationError` per unmet rule.
pub fn extract_wireguard(
    account: &AccountData,
    keys: &WireguardKeyPair,
) -> Result<WireguardProfile, ValidationError> {
    let token = non_empty(account.token.as_deref()).ok_or(ValidationError::MissingToken)?;

    let peer = account
        .config
        .peers
        .first()
        .ok_or(ValidationError::MissingPeer)?;
    let peer_public_key =
        non_empty(Some(peer.public_key.as_str())).ok_or(ValidationError::MissingPeerKey)?;

    let endpoint_v4 = peer
        .endpoint
        .as_ref()
        .and_then(|e| non_empty(e.v4.as_deref()))
        .ok_or(ValidationError::MissingEndpoint)?;
    let endpoint_v6 = peer
        .endpoint
        .as_ref()
        .and_then(|e| non_empty(e.v6.as_deref()))
        .map(Endpoint::parse);

    let addresses = account
        .config
        .interface
        .as_ref()
        .and_then(|i| i.addresses.as_ref())
        .ok_or(ValidationError::MissingAddress)?;
    let address_v4 = non_empty(addresses.v4.as_deref()).ok_or(ValidationError::MissingAddress)?;
    let address_v6 = non_empty(addresses.v6.as_deref()).map(str::to_string);

    Ok(WireguardProfile {
        device_id: account.id.clone(),
        private_key: keys.private_b64.clone(),
        token: token.to_string(),
        client_id: non_empty(account.config.client_id.as_deref()).map(str::to_string),
        account_type: ACCOUNT_TYPE_FREE.to_string(),
        peer_public_key: peer_public_key.to_string(),
        endpoint: Endpoint::parse(endpoint_v4),
        endpoint_v6,
        address_v4: address_v4.to_string(),
        address_v6,
        mtu: DEFAULT_MTU,
        keepalive: DEFAULT_KEEPALIVE,
    })
}

/// Build a MASQUE profile from an enrollment response
///
/// Requires the step-one bearer token, a peer with a public key, at least
/// one of the v4/v6 endpoints, and at least one of the v4/v6 addresses.
/// The license is optional.
///
/// # Errors
///
/// A distinct `ValidationError` per unmet rule.
pub fn extract_masque(
    account: &AccountData,
    keys: &MasqueKeyPair,
    token: &str,
) -> Result<MasqueProfile, ValidationError> {
    let token = non_empty(Some(token)).ok_or(ValidationError::MissingToken)?;

    let peer = account
        .config
        .peers
        .first()
        .ok_or(ValidationError::MissingPeer)?;
    let endpoint_public_key =
        non_empty(Some(peer.public_key.as_str())).ok_or(ValidationError::MissingPeerKey)?;

    let endpoint_v4 = peer
        .endpoint
        .as_ref()
        .and_then(|e| non_empty(e.v4.as_deref()))
        .map(Endpoint::parse);
    let endpoint_v6 = peer
        .endpoint
        .as_ref()
        .and_then(|e| non_empty(e.v6.as_deref()))
        .map(Endpoint::parse);
    if endpoint_v4.is_none() && endpoint_v6.is_none() {
        return Err(ValidationError::MissingEndpoint);
    }

    let addresses = account
        .config
        .interface
        .as_ref()
        .and_then(|i| i.addresses.as_ref());
    let address_v4 = addresses
        .and_then(|a| non_empty(a.v4.as_deref()))
        .map(str::to_string);
    let address_v6 = addresses
        .and_then(|a| non_empty(a.v6.as_deref()))
        .map(str::to_string);
    if address_v4.is_none() && address_v6.is_none() {
        return Err(ValidationError::MissingAddress);
    }

    Ok(MasqueProfile {
        device_id: account.id.clone(),
        private_key: keys.private_b64.clone(),
        access_token: token.to_string(),
        license: non_empty(account.account.license.as_deref()).map(str::to_string),
        endpoint_v4,
        endpoint_v6,
        endpoint_public_key: endpoint_public_key.to_string(),
        address_v4,
        address_v6,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wg_keys() -> WireguardKeyPair {
        WireguardKeyPair {
            private_b64: "cHJpdg==".into(),
            public_b64: "cHVi".into(),
        }
    }

    fn masque_keys() -> MasqueKeyPair {
        MasqueKeyPair {
            private_der: vec![0x30],
            public_der: vec![0x30],
            private_b64: "MA==".into(),
            public_b64: "MA==".into(),
        }
    }

    fn wg_response() -> AccountData {
        serde_json::from_str(
            r#"{
                "id": "dev-1",
                "account": {"license": "lic-1"},
                "config": {
                    "peers": [{
                        "public_key": "PK1",
                        "endpoint": {"v4": "1.2.3.4:0"}
                    }],
                    "interface": {"addresses": {"v4": "10.0.0.2"}},
                    "client_id": "AQID"
                },
                "token": "tok-1"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_wireguard_extraction() {
        let profile = extract_wireguard(&wg_response(), &wg_keys()).unwrap();

        assert_eq!(profile.device_id, "dev-1");
        assert_eq!(profile.token, "tok-1");
        assert_eq!(profile.peer_public_key, "PK1");
        assert_eq!(profile.endpoint, Endpoint::parse("1.2.3.4:0"));
        assert_eq!(profile.address_v4, "10.0.0.2");
        assert_eq!(profile.client_id.as_deref(), Some("AQID"));
        assert!(profile.endpoint_v6.is_none());
        assert!(profile.address_v6.is_none());
    }

    #[test]
    fn test_wireguard_missing_token() {
        let mut account = wg_response();
        account.token = None;
        assert_eq!(
            extract_wireguard(&account, &wg_keys()).unwrap_err(),
            ValidationError::MissingToken
        );
    }

    #[test]
    fn test_wireguard_missing_peer() {
        let mut account = wg_response();
        account.config.peers.clear();
        assert_eq!(
            extract_wireguard(&account, &wg_keys()).unwrap_err(),
            ValidationError::MissingPeer
        );
    }

    #[test]
    fn test_wireguard_requires_v4_endpoint() {
        let account: AccountData = serde_json::from_str(
            r#"{
                "id": "dev-1",
                "config": {
                    "peers": [{
                        "public_key": "PK1",
                        "endpoint": {"v6": "[2606:4700::1]:0"}
                    }],
                    "interface": {"addresses": {"v4": "10.0.0.2"}}
                },
                "token": "tok-1"
            }"#,
        )
        .unwrap();
        assert_eq!(
            extract_wireguard(&account, &wg_keys()).unwrap_err(),
            ValidationError::MissingEndpoint
        );
    }

    #[test]
    fn test_masque_tolerates_v6_only() {
        let account: AccountData = serde_json::from_str(
            r#"{
                "id": "dev-2",
                "config": {
                    "peers": [{
                        "public_key": "-----BEGIN PUBLIC KEY-----\nMFkw\n-----END PUBLIC KEY-----",
                        "endpoint": {"v6": "[2606:4700::1]:443"}
                    }],
                    "interface": {"addresses": {"v6": "fd01::2"}}
                }
            }"#,
        )
        .unwrap();

        let profile = extract_masque(&account, &masque_keys(), "tok-2").unwrap();
        assert!(profile.endpoint_v4.is_none());
        assert_eq!(
            profile.endpoint_v6,
            Some(Endpoint::parse("[2606:4700::1]:443"))
        );
        assert!(profile.address_v4.is_none());
        assert_eq!(profile.address_v6.as_deref(), Some("fd01::2"));
        assert!(profile.license.is_none());
    }

    #[test]
    fn test_masque_missing_peer() {
        let account: AccountData =
            serde_json::from_str(r#"{"id": "dev-2", "config": {}}"#).unwrap();
        assert_eq!(
            extract_masque(&account, &masque_keys(), "tok-2").unwrap_err(),
            ValidationError::MissingPeer
        );
    }

    #[test]
    fn test_masque_missing_endpoint() {
        let account: AccountData = serde_json::from_str(
            r#"{
                "id": "dev-2",
                "config": {
                    "peers": [{"public_key": "PK"}],
                    "interface": {"addresses": {"v4": "10.0.0.3"}}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            extract_masque(&account, &masque_keys(), "tok-2").unwrap_err(),
            ValidationError::MissingEndpoint
        );
    }

    #[test]
    fn test_masque_empty_token_rejected() {
        assert_eq!(
            extract_masque(&wg_response(), &masque_keys(), "").unwrap_err(),
            ValidationError::MissingToken
        );
    }
}
