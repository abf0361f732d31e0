//! Firewall rule types

use serde::{Deserialize, Serialize};

/// A firewall rule, as submitted and as read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    pub name: String,

    pub allowed: Vec<FirewallAllowed>,

    pub direction: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_ranges: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_tags: Vec<String>,
}

impl FirewallRule {
    /// Ingress TCP rule open to the world on the given ports, applied to
    /// instances carrying `target_tag`. The common shape for exposing a
    /// service port.
    pub fn ingress_tcp(name: impl Into<String>, ports: &[u16], target_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed: vec![FirewallAllowed {
                ip_protocol: "tcp".to_string(),
                ports: ports.iter().map(|p| p.to_string()).collect(),
            }],
            direction: "INGRESS".to_string(),
            source_ranges: vec!["0.0.0.0/0".to_string()],
            target_tags: vec![target_tag.into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallAllowed {
    /// Wire name is `IPProtocol`, not camelCase.
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
}
