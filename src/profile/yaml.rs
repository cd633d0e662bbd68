//! mihomo proxy-manager YAML serializer
//!
//! Emits a document with fixed top-level flags, one local SOCKS listener,
//! and one proxy entry whose shape depends on the tunnel type. Field order
//! is fixed by struct declaration order, which keeps the output
//! deterministic.

use serde::Serialize;

use super::{
    pem_body, reserved_from_client_id, with_v4_prefix, with_v6_prefix, MasqueProfile,
    SynthOptions, WireguardProfile, MASQUE_PORT,
};

/// Listener name referenced by the proxy entry
const LISTENER_NAME: &str = "socks-in-default";

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "log-level")]
    log_level: &'static str,
    ipv6: bool,
    #[serde(rename = "find-process-mode")]
    find_process_mode: &'static str,
    #[serde(rename = "tcp-concurrent")]
    tcp_concurrent: bool,
    listeners: [Listener<'a>; 1],
    proxies: [Proxy<'a>; 1],
}

#[derive(Serialize)]
struct Listener<'a> {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    port: u16,
    listen: &'a str,
    udp: bool,
    proxy: &'static str,
}

/// One proxy entry; covers both tunnel shapes, absent fields are skipped
#[derive(Serialize)]
struct Proxy<'a> {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    server: &'a str,
    port: u16,
    #[serde(rename = "private-key")]
    private_key: &'a str,
    #[serde(rename = "public-key")]
    public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reserved: Option<[u8; 3]>,
    udp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mtu: Option<u16>,
    #[serde(rename = "remote-dns-resolve")]
    remote_dns_resolve: bool,
    dns: &'a [String],
}

fn document<'a>(options: &'a SynthOptions, proxy_name: &'static str, proxy: Proxy<'a>) -> Document<'a> {
    Document {
        log_level: "info",
        ipv6: true,
        find_process_mode: "off",
        tcp_concurrent: true,
        listeners: [Listener {
            name: LISTENER_NAME,
            kind: "socks",
            port: options.port,
            listen: &options.listen,
            udp: true,
            proxy: proxy_name,
        }],
        proxies: [proxy],
    }
}

/// The YAML emitter quotes the bare token `off` to keep it from reading as a
/// YAML 1.1 boolean; mihomo wants the sentinel literal unquoted.
fn unquote_find_process_mode(rendered: String) -> String {
    rendered
        .replace("find-process-mode: 'off'", "find-process-mode: off")
        .replace("find-process-mode: \"off\"", "find-process-mode: off")
}

/// Render a mihomo document for a WireGuard profile
///
/// # Errors
///
/// Returns the underlying serializer error, which for this fixed shape only
/// occurs on emitter failure.
pub fn render_wireguard_yaml(
    profile: &WireguardProfile,
    options: &SynthOptions,
) -> Result<String, serde_yaml::Error> {
    let proxy = Proxy {
        name: "wireguard",
        kind: "wireguard",
        server: &profile.endpoint.host,
        port: profile.endpoint.resolved_port(),
        private_key: &profile.private_key,
        public_key: profile.peer_public_key.clone(),
        ip: Some(with_v4_prefix(&profile.address_v4)),
        ipv6: profile.address_v6.as_deref().map(with_v6_prefix),
        reserved: profile
            .client_id
            .as_deref()
            .and_then(reserved_from_client_id),
        udp: true,
        mtu: Some(profile.mtu),
        remote_dns_resolve: true,
        dns: &options.dns,
    };

    let rendered = serde_yaml::to_string(&document(options, "wireguard", proxy))?;
    Ok(unquote_find_process_mode(rendered))
}

/// Render a mihomo document for a MASQUE profile
///
/// The peer key arrives PEM-wrapped and is reduced to its base64 payload;
/// the proxy port is fixed at 443.
///
/// # Errors
///
/// Returns the underlying serializer error.
pub fn render_masque_yaml(
    profile: &MasqueProfile,
    options: &SynthOptions,
) -> Result<String, serde_yaml::Error> {
    // v4 endpoint preferred, v6 as fallback; extraction guarantees one exists
    let endpoint = profile
        .endpoint_v4
        .as_ref()
        .or(profile.endpoint_v6.as_ref());
    let server = endpoint.map(|e| e.host.as_str()).unwrap_or_default();

    let proxy = Proxy {
        name: "masque",
        kind: "masque",
        server,
        port: MASQUE_PORT,
        private_key: &profile.private_key,
        public_key: pem_body(&profile.endpoint_public_key),
        ip: profile.address_v4.as_deref().map(with_v4_prefix),
        ipv6: profile.address_v6.as_deref().map(with_v6_prefix),
        reserved: None,
        udp: true,
        mtu: None,
        remote_dns_resolve: true,
        dns: &options.dns,
    };

    let rendered = serde_yaml::to_string(&document(options, "masque", proxy))?;
    Ok(unquote_find_process_mode(rendered))
}
