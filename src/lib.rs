//! warpgen: WARP device provisioning and proxy config generation
//!
//! This crate registers a disposable WARP device identity against the
//! Cloudflare registration API and emits ready-to-use tunnel client
//! configuration: a WireGuard INI profile and/or a mihomo proxy YAML.
//!
//! # Pipeline
//!
//! ```text
//! key generation → registration call(s) → extraction → synthesis → output
//! ```
//!
//! Two tunnel types are supported:
//!
//! - **WireGuard**: an x25519 key pair registered in a single `POST`.
//! - **MASQUE**: a two-step enrollment — account creation under a placeholder
//!   key, then a `PATCH` carrying the hand-DER-encoded P-256 public key.
//!
//! # Quick Start
//!
//! ```no_run
//! use warpgen::api::ApiSettings;
//! use warpgen::profile::SynthOptions;
//! use warpgen::provision::provision_wireguard;
//!
//! # async fn example() -> warpgen::error::Result<()> {
//! let configs = provision_wireguard(
//!     &ApiSettings::default(),
//!     &SynthOptions::default(),
//!     None,
//! )
//! .await?;
//! println!("{}", configs.yaml);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`api`]: registration service client and wire types
//! - [`error`]: error taxonomy
//! - [`extract`]: response validation and flattening
//! - [`keys`]: key material generation, including the DER templates
//! - [`profile`]: tunnel profiles and the INI/YAML serializers
//! - [`provision`]: end-to-end flows

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod error;
pub mod extract;
pub mod keys;
pub mod profile;
pub mod provision;

// Re-export commonly used types at the crate root
pub use api::{AccountData, ApiSettings, RegistrationClient};
pub use error::{ApiError, KeyError, ValidationError, WarpgenError};
pub use extract::{extract_masque, extract_wireguard};
pub use keys::{generate_masque_keypair, generate_wireguard_keypair};
pub use profile::{Endpoint, MasqueProfile, SynthOptions, WireguardProfile};
pub use provision::{provision_masque, provision_wireguard};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
