//! Reconciliation of a whole rule set.
//!
//! Declared rules are matched to remote rules by [`RuleConfig::fingerprint`].
//! A matched rule keeps its declared position, and each of its party lists is
//! reconciled with [`reconcile_lists`]. Declared rules with no remote match
//! are dropped; remote rules with no declared match are appended in remote
//! order. The resulting set of `(protocol, port_range)` keys is always the
//! remote set.
//!
//! If the remote returns two rules with the same key, the later one wins.

use std::collections::HashMap;

use tracing::debug;

use crate::reconcile::reconcile_lists;
use crate::schema::Direction;
use crate::state::{PartySet, RuleConfig};

/// Reconcile declared rules against the remote rule set.
///
/// When either side is empty the remote rules are returned as-is.
#[must_use]
pub fn reconcile_rules(local: &[RuleConfig], remote: Vec<RuleConfig>) -> Vec<RuleConfig> {
    if remote.is_empty() || local.is_empty() {
        return remote;
    }

    let mut remote_by_fingerprint: HashMap<u64, &RuleConfig> = HashMap::with_capacity(remote.len());
    for rule in &remote {
        remote_by_fingerprint.insert(rule.fingerprint(), rule);
    }

    let mut merged = Vec::with_capacity(remote_by_fingerprint.len());
    for rule in local {
        let Some(matched) = remote_by_fingerprint.remove(&rule.fingerprint()) else {
            continue;
        };
        merged.push(RuleConfig {
            protocol: rule.protocol.clone(),
            port_range: rule.port_range.clone(),
            parties: reconcile_parties(&rule.parties, &matched.parties),
        });
    }

    for rule in &remote {
        if let Some(drift) = remote_by_fingerprint.remove(&rule.fingerprint()) {
            merged.push(drift.clone());
        }
    }

    merged
}

/// Reconcile each party list of a matched rule independently.
#[must_use]
pub fn reconcile_parties(local: &PartySet, remote: &PartySet) -> PartySet {
    PartySet {
        addresses: reconcile_lists(&local.addresses, &remote.addresses),
        tags: reconcile_lists(&local.tags, &remote.tags),
        instance_ids: reconcile_lists(&local.instance_ids, &remote.instance_ids),
        load_balancer_uids: reconcile_lists(&local.load_balancer_uids, &remote.load_balancer_uids),
    }
}

/// [`reconcile_rules`] for one direction, with logging.
pub(crate) fn reconcile_direction(
    direction: Direction,
    local: &[RuleConfig],
    remote: Vec<RuleConfig>,
) -> Vec<RuleConfig> {
    let declared = local.len();
    let observed = remote.len();
    let merged = reconcile_rules(local, remote);
    debug!(
        block = direction.block_name(),
        declared,
        observed,
        merged = merged.len(),
        "Reconciled firewall rules"
    );
    merged
}
