//! End-to-end provisioning flows
//!
//! Each flow runs strictly sequentially: key generation, the network
//! call(s), extraction, synthesis. Only the HTTP calls block, and they are
//! bounded by the API timeout. The MASQUE flow is a two-step protocol, not
//! a retryable idempotent call; the intermediate bearer token feeds the
//! enrollment PATCH and the final profile, nothing else.

use tracing::info;

use crate::api::{
    ApiSettings, Registration, RegistrationClient, KEY_TYPE_WIREGUARD, TUNNEL_TYPE_WIREGUARD,
};
use crate::error::{Result, ValidationError};
use crate::extract::{extract_masque, extract_wireguard};
use crate::keys;
use crate::profile::{ini, yaml, SynthOptions};

/// Device model reported at registration
const DEVICE_MODEL: &str = "PC";

/// Locale reported at registration
const DEVICE_LOCALE: &str = "en_US";

/// Display name used for MASQUE enrollment when the caller gives none
const DEFAULT_DEVICE_NAME: &str = "warpgen";

/// Output of a WireGuard provisioning run
#[derive(Debug, Clone)]
pub struct WireguardConfigs {
    pub device_id: String,
    pub ini: String,
    pub yaml: String,
}

/// Output of a MASQUE provisioning run
#[derive(Debug, Clone)]
pub struct MasqueConfigs {
    pub device_id: String,
    pub yaml: String,
}

/// Provision a WireGuard device and synthesize its configs
///
/// Generates a fresh x25519 pair, registers it in a single `POST`, then
/// renders both output formats from the response.
///
/// # Errors
///
/// Any stage failure terminates the run; see [`crate::error`].
pub async fn provision_wireguard(
    settings: &ApiSettings,
    options: &SynthOptions,
    jwt: Option<&str>,
) -> Result<WireguardConfigs> {
    let pair = keys::generate_wireguard_keypair()?;
    let serial = keys::random_serial()?;
    info!("WireGuard key pair generated");

    let registration = Registration::new(
        &pair.public_b64,
        &serial,
        KEY_TYPE_WIREGUARD,
        TUNNEL_TYPE_WIREGUARD,
        DEVICE_MODEL,
        DEVICE_LOCALE,
    );
    let client = RegistrationClient::new(settings.clone());
    let account = client.register(&registration, jwt).await?;
    info!("account created: {}", account.id);

    let profile = extract_wireguard(&account, &pair)?;
    let ini = ini::render_wireguard_ini(&profile, options);
    let yaml = yaml::render_wireguard_yaml(&profile, options)?;

    Ok(WireguardConfigs {
        device_id: account.id,
        ini,
        yaml,
    })
}

/// Provision a MASQUE device and synthesize its config
///
/// Step one registers an account under a random placeholder key; step two
/// enrolls the freshly generated P-256 public key with the bearer token
/// from step one and yields the device's real peer/interface assignment.
///
/// # Errors
///
/// Any stage failure terminates the run; see [`crate::error`].
pub async fn provision_masque(
    settings: &ApiSettings,
    options: &SynthOptions,
    jwt: Option<&str>,
    name: Option<&str>,
) -> Result<MasqueConfigs> {
    let placeholder = keys::random_placeholder_key()?;
    let serial = keys::random_serial()?;

    let registration = Registration::new(
        &placeholder,
        &serial,
        KEY_TYPE_WIREGUARD,
        TUNNEL_TYPE_WIREGUARD,
        DEVICE_MODEL,
        DEVICE_LOCALE,
    );
    let client = RegistrationClient::new(settings.clone());
    let account = client.register(&registration, jwt).await?;
    info!("account created: {}", account.id);

    let token = account
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or(ValidationError::MissingToken)?;

    let pair = keys::generate_masque_keypair()?;
    info!("P-256 key pair generated");

    let updated = client
        .enroll_key(
            &account.id,
            &token,
            &pair.public_der,
            Some(name.unwrap_or(DEFAULT_DEVICE_NAME)),
        )
        .await?;
    info!("MASQUE key enrolled");

    let profile = extract_masque(&updated, &pair, &token)?;
    let yaml = yaml::render_masque_yaml(&profile, options)?;

    Ok(MasqueConfigs {
        device_id: updated.id,
        yaml,
    })
}
