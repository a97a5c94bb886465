//! Firewall API wire models.
//!
//! Field names on the wire follow the provider API (`droplet_ids`, `ports`);
//! the Rust names describe what the values are. List fields always serialize
//! as arrays and tolerate `null` or absence in responses.

use chrono::{DateTime, Utc};
use firewall_core::FirewallId;
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Selectors a rule applies to: sources for inbound rules, destinations for
/// outbound rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parties {
    /// IPv4/IPv6 addresses and CIDR blocks.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub addresses: Vec<String>,
    /// Instance tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Target instance IDs.
    #[serde(rename = "droplet_ids", default, deserialize_with = "null_as_empty")]
    pub instance_ids: Vec<i64>,
    /// Load balancer UIDs.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub load_balancer_uids: Vec<String>,
}

/// Inbound rule as sent to and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundRule {
    /// Protocol (`tcp`, `udp` or `icmp`).
    pub protocol: String,
    /// Port range; `"0"` and `"all"` both mean every port.
    #[serde(rename = "ports", default)]
    pub port_range: String,
    /// Traffic sources.
    #[serde(default)]
    pub sources: Parties,
}

/// Outbound rule as sent to and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundRule {
    /// Protocol (`tcp`, `udp` or `icmp`).
    pub protocol: String,
    /// Port range; `"0"` and `"all"` both mean every port.
    #[serde(rename = "ports", default)]
    pub port_range: String,
    /// Traffic destinations.
    #[serde(default)]
    pub destinations: Parties,
}

/// Request payload for creating or replacing a firewall.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirewallRequest {
    /// Firewall name.
    pub name: String,
    /// Instances the firewall is applied to.
    #[serde(rename = "droplet_ids", default)]
    pub instance_ids: Vec<i64>,
    /// Tags selecting the instances the firewall is applied to.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inbound rules.
    #[serde(default)]
    pub inbound_rules: Vec<InboundRule>,
    /// Outbound rules.
    #[serde(default)]
    pub outbound_rules: Vec<OutboundRule>,
}

/// In-flight propagation of the firewall to one instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingChange {
    /// Instance the change applies to.
    #[serde(rename = "droplet_id")]
    pub instance_id: i64,
    /// Whether the firewall is being removed from the instance.
    #[serde(default)]
    pub removing: bool,
    /// Propagation status.
    #[serde(default)]
    pub status: String,
}

/// Firewall as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Firewall {
    /// Firewall UUID.
    pub id: FirewallId,
    /// Firewall name.
    pub name: String,
    /// Firewall status (`waiting`, `succeeded`, `failed`).
    #[serde(default)]
    pub status: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Inbound rules.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inbound_rules: Vec<InboundRule>,
    /// Outbound rules.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub outbound_rules: Vec<OutboundRule>,
    /// Instances the firewall is applied to.
    #[serde(rename = "droplet_ids", default, deserialize_with = "null_as_empty")]
    pub instance_ids: Vec<i64>,
    /// Tags selecting the instances the firewall is applied to.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Propagation still in progress.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pending_changes: Vec<PendingChange>,
}

/// Single-firewall response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FirewallEnvelope {
    pub firewall: Firewall,
}
