//! HTTPS client for the device registration service
//!
//! Two protocols are spoken here: a single-`POST` registration used when the
//! real tunnel key is already known (WireGuard), and a two-step enrollment
//! for MASQUE where the account is created with a placeholder key and the
//! real P-256 key is `PATCH`ed in afterwards with the bearer token from
//! step one.
//!
//! Every call is bounded by the configured timeout and is not retried;
//! a non-success status is surfaced verbatim as `RegistrationFailed`.

use base64::prelude::*;
use http_body_util::{BodyExt, Full};
use hyper::{body::Bytes, Method, Request};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use super::types::{AccountData, DeviceUpdate, Registration};
use super::{ApiSettings, CLIENT_VERSION, KEY_TYPE_MASQUE, TUNNEL_TYPE_MASQUE, USER_AGENT};
use crate::error::ApiError;

/// Header carrying an enterprise (Zero Trust) access token; deliberately not
/// `Authorization`, which the enrollment step uses for its bearer token.
const ACCESS_JWT_HEADER: &str = "CF-Access-Jwt-Assertion";

/// Client for the registration API
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    settings: ApiSettings,
}

impl RegistrationClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings }
    }

    /// Register a new device (`POST /reg`)
    ///
    /// # Errors
    ///
    /// `ApiError::Timeout` after the configured deadline,
    /// `ApiError::RegistrationFailed` on any non-success status.
    pub async fn register(
        &self,
        registration: &Registration,
        jwt: Option<&str>,
    ) -> Result<AccountData, ApiError> {
        let uri = format!(
            "{}/{}/reg",
            self.settings.base_url, self.settings.version
        );
        debug!("registering device at {}", uri);

        let mut builder = request_builder(Method::POST, &uri);
        if let Some(jwt) = jwt {
            builder = builder.header(ACCESS_JWT_HEADER, jwt);
        }

        let body = serde_json::to_string(registration)?;
        let request = builder.body(Full::new(Bytes::from(body)))?;
        self.send(request).await
    }

    /// Enroll the real MASQUE key on an existing device (`PATCH /reg/{id}`)
    ///
    /// `token` is the bearer token returned by the registration step.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`register`](Self::register).
    pub async fn enroll_key(
        &self,
        account_id: &str,
        token: &str,
        public_key_der: &[u8],
        name: Option<&str>,
    ) -> Result<AccountData, ApiError> {
        let uri = format!(
            "{}/{}/reg/{}",
            self.settings.base_url, self.settings.version, account_id
        );
        debug!("enrolling MASQUE key at {}", uri);

        let update = DeviceUpdate {
            key: BASE64_STANDARD.encode(public_key_der),
            key_type: KEY_TYPE_MASQUE.to_string(),
            tunnel_type: TUNNEL_TYPE_MASQUE.to_string(),
            name: name.map(str::to_string),
        };

        let body = serde_json::to_string(&update)?;
        let request = request_builder(Method::PATCH, &uri)
            .header("Authorization", format!("Bearer {token}"))
            .body(Full::new(Bytes::from(body)))?;
        self.send(request).await
    }

    /// Issue one HTTPS request and parse the response body
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<AccountData, ApiError> {
        let _ = rustls::crypto::ring::default_provider().install_default();

        let https = HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| ApiError::Tls(e.to_string()))?
            .https_only()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(https);

        let timeout = self.settings.timeout;
        let response = tokio::time::timeout(timeout, client.request(request))
            .await
            .map_err(|_| ApiError::Timeout {
                seconds: timeout.as_secs(),
            })?
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let (parts, body) = response.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?
            .to_bytes();

        if !parts.status.is_success() {
            return Err(ApiError::RegistrationFailed {
                status: parts.status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let account: AccountData = serde_json::from_slice(&bytes)?;
        debug!("service answered with device id {}", account.id);
        Ok(account)
    }
}

/// Fixed header set every request carries
fn request_builder(method: Method, uri: &str) -> hyper::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("User-Agent", USER_AGENT)
        .header("CF-Client-Version", CLIENT_VERSION)
        .header("Content-Type", "application/json; charset=UTF-8")
        .header("Connection", "Keep-Alive")
}
