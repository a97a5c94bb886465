//! Building API requests from declared configuration.
//!
//! Pure transformation: no remote calls. Instance IDs are declared as strings
//! and must parse as integers.

use firewall_api::FirewallRequest;
use validator::Validate;

use crate::error::BuildError;
use crate::state::FirewallConfig;

/// Build the create/update request for a declared firewall.
///
/// # Errors
///
/// Returns [`BuildError::Validation`] if the name is missing and
/// [`BuildError::InvalidInstanceId`] if an instance ID is not an integer.
pub fn build_request(config: &FirewallConfig) -> Result<FirewallRequest, BuildError> {
    config.validate()?;

    Ok(FirewallRequest {
        name: config.name.clone(),
        instance_ids: parse_instance_ids(&config.instance_ids)?,
        tags: config.tags.clone(),
        inbound_rules: config.inbound_rules.iter().map(|r| r.to_inbound()).collect(),
        outbound_rules: config.outbound_rules.iter().map(|r| r.to_outbound()).collect(),
    })
}

/// Parse declared instance IDs.
///
/// # Errors
///
/// Fails on the first value that is not an integer literal.
pub fn parse_instance_ids(ids: &[String]) -> Result<Vec<i64>, BuildError> {
    ids.iter()
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|source| BuildError::InvalidInstanceId {
                    value: raw.clone(),
                    source,
                })
        })
        .collect()
}
