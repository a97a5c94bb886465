//! Typed local state of a firewall resource.
//!
//! [`FirewallConfig`] holds the declared fields. After every successful read
//! it is overwritten with the reconciled remote values, so it doubles as the
//! ordering hint for the next read.
//!
//! The serialized form of [`FirewallResource`] is the flat layout described by
//! [`firewall_schema`](crate::schema::firewall_schema): rule blocks carry
//! `source_*` or `destination_*` party fields, and computed fields sit next to
//! the declared ones.

use firewall_api::{InboundRule, OutboundRule, Parties, PendingChange};
use firewall_core::FirewallId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::fingerprint::fingerprint;

/// Sources (inbound) or destinations (outbound) of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartySet {
    /// Addresses and CIDR blocks.
    pub addresses: Vec<String>,
    /// Instance tags.
    pub tags: Vec<String>,
    /// Target instance IDs.
    pub instance_ids: Vec<i64>,
    /// Load balancer UIDs.
    pub load_balancer_uids: Vec<String>,
}

impl PartySet {
    /// Convert from the wire representation.
    #[must_use]
    pub fn from_wire(parties: &Parties) -> Self {
        Self {
            addresses: parties.addresses.clone(),
            tags: parties.tags.clone(),
            instance_ids: parties.instance_ids.clone(),
            load_balancer_uids: parties.load_balancer_uids.clone(),
        }
    }

    /// Convert to the wire representation.
    #[must_use]
    pub fn to_wire(&self) -> Parties {
        Parties {
            addresses: self.addresses.clone(),
            tags: self.tags.clone(),
            instance_ids: self.instance_ids.clone(),
            load_balancer_uids: self.load_balancer_uids.clone(),
        }
    }
}

/// One declared rule. Whether `parties` are sources or destinations depends
/// on the rule set it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig {
    /// Protocol (`tcp`, `udp` or `icmp`).
    pub protocol: String,
    /// Port range.
    pub port_range: String,
    /// Sources or destinations.
    pub parties: PartySet,
}

impl RuleConfig {
    /// Create a rule with no parties.
    #[must_use]
    pub fn new(protocol: impl Into<String>, port_range: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            port_range: port_range.into(),
            parties: PartySet::default(),
        }
    }

    /// Set the parties.
    #[must_use]
    pub fn with_parties(mut self, parties: PartySet) -> Self {
        self.parties = parties;
        self
    }

    /// Identity key of this rule within its rule set.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        fingerprint(&self.protocol, &self.port_range)
    }

    /// Convert a remote inbound rule.
    #[must_use]
    pub fn from_inbound(rule: &InboundRule) -> Self {
        Self {
            protocol: rule.protocol.clone(),
            port_range: rule.port_range.clone(),
            parties: PartySet::from_wire(&rule.sources),
        }
    }

    /// Convert a remote outbound rule.
    #[must_use]
    pub fn from_outbound(rule: &OutboundRule) -> Self {
        Self {
            protocol: rule.protocol.clone(),
            port_range: rule.port_range.clone(),
            parties: PartySet::from_wire(&rule.destinations),
        }
    }

    /// Wire shape of this rule as an inbound rule.
    #[must_use]
    pub fn to_inbound(&self) -> InboundRule {
        InboundRule {
            protocol: self.protocol.clone(),
            port_range: self.port_range.clone(),
            sources: self.parties.to_wire(),
        }
    }

    /// Wire shape of this rule as an outbound rule.
    #[must_use]
    pub fn to_outbound(&self) -> OutboundRule {
        OutboundRule {
            protocol: self.protocol.clone(),
            port_range: self.port_range.clone(),
            destinations: self.parties.to_wire(),
        }
    }
}

/// Serde adapter for one direction's rule blocks, flattening [`PartySet`]
/// into prefixed fields.
macro_rules! rule_blocks {
    ($module:ident, $addresses:ident, $tags:ident, $instance_ids:ident, $load_balancer_uids:ident) => {
        mod $module {
            use super::{PartySet, RuleConfig};
            use serde::{Deserialize, Deserializer, Serialize, Serializer};

            #[derive(Serialize, Deserialize)]
            struct Block {
                #[serde(default)]
                protocol: String,
                #[serde(default)]
                port_range: String,
                #[serde(default)]
                $addresses: Vec<String>,
                #[serde(default)]
                $tags: Vec<String>,
                #[serde(default)]
                $instance_ids: Vec<i64>,
                #[serde(default)]
                $load_balancer_uids: Vec<String>,
            }

            impl From<&RuleConfig> for Block {
                fn from(rule: &RuleConfig) -> Self {
                    Self {
                        protocol: rule.protocol.clone(),
                        port_range: rule.port_range.clone(),
                        $addresses: rule.parties.addresses.clone(),
                        $tags: rule.parties.tags.clone(),
                        $instance_ids: rule.parties.instance_ids.clone(),
                        $load_balancer_uids: rule.parties.load_balancer_uids.clone(),
                    }
                }
            }

            impl From<Block> for RuleConfig {
                fn from(block: Block) -> Self {
                    Self {
                        protocol: block.protocol,
                        port_range: block.port_range,
                        parties: PartySet {
                            addresses: block.$addresses,
                            tags: block.$tags,
                            instance_ids: block.$instance_ids,
                            load_balancer_uids: block.$load_balancer_uids,
                        },
                    }
                }
            }

            pub(super) fn serialize<S>(rules: &[RuleConfig], serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_seq(rules.iter().map(Block::from))
            }

            pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<RuleConfig>, D::Error>
            where
                D: Deserializer<'de>,
            {
                let blocks = Vec::<Block>::deserialize(deserializer)?;
                Ok(blocks.into_iter().map(RuleConfig::from).collect())
            }
        }
    };
}

rule_blocks!(
    inbound_blocks,
    source_addresses,
    source_tags,
    source_instance_ids,
    source_load_balancer_uids
);
rule_blocks!(
    outbound_blocks,
    destination_addresses,
    destination_tags,
    destination_instance_ids,
    destination_load_balancer_uids
);

/// Declared firewall fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FirewallConfig {
    /// Firewall name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Target instance IDs, as declared (decimal strings).
    #[serde(default)]
    pub instance_ids: Vec<String>,
    /// Tags selecting target instances.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inbound rules.
    #[serde(default, rename = "inbound_rule", with = "inbound_blocks")]
    pub inbound_rules: Vec<RuleConfig>,
    /// Outbound rules.
    #[serde(default, rename = "outbound_rule", with = "outbound_blocks")]
    pub outbound_rules: Vec<RuleConfig>,
}

impl FirewallConfig {
    /// Create a configuration with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// In-flight propagation of the firewall to one instance, as stored locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChangeRecord {
    /// Instance the change applies to.
    #[serde(default)]
    pub instance_id: i64,
    /// Whether the firewall is being removed from the instance.
    #[serde(default)]
    pub removing: bool,
    /// Propagation status.
    #[serde(default)]
    pub status: String,
}

impl From<PendingChange> for PendingChangeRecord {
    fn from(change: PendingChange) -> Self {
        Self {
            instance_id: change.instance_id,
            removing: change.removing,
            status: change.status,
        }
    }
}

/// Read-only fields populated from the remote firewall.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedState {
    /// Remote status.
    #[serde(default)]
    pub status: String,
    /// Creation time, RFC 3339.
    #[serde(default)]
    pub created_at: String,
    /// In-flight propagation records, as reported.
    #[serde(default)]
    pub pending_changes: Vec<PendingChangeRecord>,
}

/// Lifecycle position of the remote resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// No remote resource is tracked.
    #[default]
    Absent,
    /// Create in progress.
    Creating,
    /// Remote resource exists.
    Present,
    /// Update in progress.
    Updating,
    /// Delete in progress.
    Deleting,
}

/// Everything the host tool stores for one firewall resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallResource {
    /// Remote identity; `None` while absent.
    #[serde(default)]
    pub id: Option<FirewallId>,
    /// Lifecycle position.
    #[serde(default)]
    pub lifecycle: Lifecycle,
    /// Declared fields.
    #[serde(flatten)]
    pub config: FirewallConfig,
    /// Computed fields.
    #[serde(flatten)]
    pub computed: ComputedState,
}

impl FirewallResource {
    /// A resource that has not been created yet.
    #[must_use]
    pub fn new(config: FirewallConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A resource known only by its remote ID.
    #[must_use]
    pub fn with_id(id: FirewallId) -> Self {
        Self {
            id: Some(id),
            lifecycle: Lifecycle::Present,
            ..Self::default()
        }
    }

    /// Forget the remote identity.
    pub fn clear_identity(&mut self) {
        self.id = None;
        self.lifecycle = Lifecycle::Absent;
    }

    /// True when a remote resource is tracked.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.id.is_some()
    }
}
