//! WireGuard INI profile serializer
//!
//! Sections and keys follow the client's expected layout: `[Device]`,
//! `[Account]`, `[Interface]`, `[Peer]`. Line order is fixed for
//! readability; omitted optionals simply drop their line.

use super::{with_v4_prefix, with_v6_prefix, SynthOptions, WireguardProfile};

/// Render a WireGuard INI profile
pub fn render_wireguard_ini(profile: &WireguardProfile, options: &SynthOptions) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(16);

    lines.push("[Device]".to_string());
    lines.push(format!("MTU={}", profile.mtu));

    lines.push("[Account]".to_string());
    lines.push(format!("PrivateKey={}", profile.private_key));
    lines.push(format!("Token={}", profile.token));
    lines.push(format!("Device={}", profile.device_id));
    lines.push(format!(
        "ClientId={}",
        profile.client_id.as_deref().unwrap_or_default()
    ));
    lines.push(format!("Type={}", profile.account_type));

    lines.push("[Interface]".to_string());
    lines.push(format!("Address={}", with_v4_prefix(&profile.address_v4)));
    lines.push(format!("DNS={}", options.dns.join(",")));
    if let Some(address_v6) = &profile.address_v6 {
        lines.push(format!("Address6={}", with_v6_prefix(address_v6)));
    }

    lines.push("[Peer]".to_string());
    lines.push(format!("PublicKey={}", profile.peer_public_key));
    lines.push(format!("Endpoint={}", profile.endpoint.to_resolved_string()));
    if let Some(endpoint_v6) = &profile.endpoint_v6 {
        lines.push(format!("Endpoint6={}", endpoint_v6.to_resolved_string()));
    }
    lines.push(format!("KeepAlive={}", profile.keepalive));

    lines.join("\n") + "\n"
}
