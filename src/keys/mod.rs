//! Key material generation
//!
//! Produces the asymmetric key pairs the two tunnel types need, plus the
//! throwaway key/serial the registration API requires at account-creation
//! time. Every invocation draws fresh material; nothing is reused across
//! registration attempts.

pub mod der;

use base64::prelude::*;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::error::KeyError;

/// x25519 key pair for the WireGuard tunnel type
///
/// The wire protocol consumes raw 32-byte values base64-encoded, so no
/// container format is involved.
#[derive(Debug, Clone)]
pub struct WireguardKeyPair {
    /// Private scalar, base64
    pub private_b64: String,
    /// Public point, base64
    pub public_b64: String,
}

/// P-256 key pair for the MASQUE tunnel type
///
/// Both halves are wrapped in standard ASN.1 containers (SEC1 private key,
/// SPKI public key) assembled in [`der`].
#[derive(Debug, Clone)]
pub struct MasqueKeyPair {
    /// SEC1 ECPrivateKey, DER
    pub private_der: Vec<u8>,
    /// SubjectPublicKeyInfo, DER
    pub public_der: Vec<u8>,
    /// SEC1 ECPrivateKey, base64
    pub private_b64: String,
    /// SubjectPublicKeyInfo, base64
    pub public_b64: String,
}

fn random_bytes<const N: usize>() -> Result<[u8; N], KeyError> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| KeyError::EntropyUnavailable(e.to_string()))?;
    Ok(buf)
}

/// Generate an x25519 key pair for WireGuard registration
///
/// # Errors
///
/// Fails only if the system entropy source is unavailable.
pub fn generate_wireguard_keypair() -> Result<WireguardKeyPair, KeyError> {
    debug!("generating x25519 keypair");

    let secret = StaticSecret::from(random_bytes::<32>()?);
    let public = PublicKey::from(&secret);

    Ok(WireguardKeyPair {
        private_b64: BASE64_STANDARD.encode(secret.to_bytes()),
        public_b64: BASE64_STANDARD.encode(public.as_bytes()),
    })
}

/// Generate a P-256 key pair for MASQUE enrollment, DER-encoded
///
/// # Errors
///
/// Fails if the entropy source is unavailable or a curve output violates
/// the fixed-length template assumptions.
pub fn generate_masque_keypair() -> Result<MasqueKeyPair, KeyError> {
    debug!("generating P-256 keypair");

    let secret = random_p256_scalar()?;
    let scalar = secret.to_bytes();
    let point = secret.public_key().to_encoded_point(false);

    let private_der = der::encode_sec1_private_key(scalar.as_slice(), point.as_bytes())?;
    let public_der = der::encode_spki_public_key(point.as_bytes())?;
    let private_b64 = BASE64_STANDARD.encode(&private_der);
    let public_b64 = BASE64_STANDARD.encode(&public_der);

    Ok(MasqueKeyPair {
        private_der,
        public_der,
        private_b64,
        public_b64,
    })
}

/// Number of redraws before scalar sampling gives up
const SCALAR_SAMPLING_ATTEMPTS: u32 = 64;

/// Draw a scalar valid for prime256v1
///
/// A uniform 32-byte string falls outside the valid scalar range with
/// probability around 2^-32; redraw when it does.
fn random_p256_scalar() -> Result<p256::SecretKey, KeyError> {
    for _ in 0..SCALAR_SAMPLING_ATTEMPTS {
        let candidate = random_bytes::<32>()?;
        if let Ok(secret) = p256::SecretKey::from_slice(&candidate) {
            return Ok(secret);
        }
    }
    Err(KeyError::ScalarSamplingExhausted {
        attempts: SCALAR_SAMPLING_ATTEMPTS,
    })
}

/// Random 32-byte value presented as a placeholder public key
///
/// The registration API requires some key at account-creation time even when
/// the real key is enrolled afterwards.
///
/// # Errors
///
/// Fails only if the system entropy source is unavailable.
pub fn random_placeholder_key() -> Result<String, KeyError> {
    Ok(BASE64_STANDARD.encode(random_bytes::<32>()?))
}

/// Random 8-byte device serial number, hex-encoded
///
/// # Errors
///
/// Fails only if the system entropy source is unavailable.
pub fn random_serial() -> Result<String, KeyError> {
    Ok(hex::encode(random_bytes::<8>()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wireguard_keypair_shape() {
        let pair = generate_wireguard_keypair().unwrap();

        let private = BASE64_STANDARD.decode(&pair.private_b64).unwrap();
        let public = BASE64_STANDARD.decode(&pair.public_b64).unwrap();
        assert_eq!(private.len(), 32);
        assert_eq!(public.len(), 32);
    }

    #[test]
    fn test_wireguard_public_key_matches_private() {
        let pair = generate_wireguard_keypair().unwrap();

        let private: [u8; 32] = BASE64_STANDARD
            .decode(&pair.private_b64)
            .unwrap()
            .try_into()
            .unwrap();
        let derived = PublicKey::from(&StaticSecret::from(private));
        assert_eq!(BASE64_STANDARD.encode(derived.as_bytes()), pair.public_b64);
    }

    #[test]
    fn test_masque_keypair_parses() {
        let pair = generate_masque_keypair().unwrap();

        // Both containers must carry the same key
        let secret = p256::SecretKey::from_sec1_der(&pair.private_der).unwrap();
        let public = {
            use p256::pkcs8::DecodePublicKey;
            p256::PublicKey::from_public_key_der(&pair.public_der).unwrap()
        };
        assert_eq!(secret.public_key(), public);

        assert_eq!(
            BASE64_STANDARD.decode(&pair.private_b64).unwrap(),
            pair.private_der
        );
        assert_eq!(
            BASE64_STANDARD.decode(&pair.public_b64).unwrap(),
            pair.public_der
        );
    }

    #[test]
    fn test_fresh_material_per_call() {
        let a = generate_wireguard_keypair().unwrap();
        let b = generate_wireguard_keypair().unwrap();
        assert_ne!(a.private_b64, b.private_b64);

        let a = generate_masque_keypair().unwrap();
        let b = generate_masque_keypair().unwrap();
        assert_ne!(a.private_der, b.private_der);
    }

    #[test]
    fn test_out_of_range_scalars_are_redraw_cases() {
        // The two candidates a redraw exists for: zero and >= the curve order
        assert!(p256::SecretKey::from_slice(&[0u8; 32]).is_err());
        assert!(p256::SecretKey::from_slice(&[0xFFu8; 32]).is_err());
    }

    #[test]
    fn test_sampling_exhaustion_is_not_an_entropy_failure() {
        let err = KeyError::ScalarSamplingExhausted { attempts: 64 };
        assert!(!err.is_recoverable());

        let msg = err.to_string();
        assert!(msg.contains("64 redraws"));
        assert!(!msg.contains("entropy"));
    }

    #[test]
    fn test_auxiliary_randoms() {
        let key = random_placeholder_key().unwrap();
        assert_eq!(BASE64_STANDARD.decode(&key).unwrap().len(), 32);

        let serial = random_serial().unwrap();
        assert_eq!(serial.len(), 16);
        assert!(serial.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
