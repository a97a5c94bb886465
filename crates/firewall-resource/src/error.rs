//! Errors surfaced by the firewall resource.

use firewall_core::Error;
use std::num::ParseIntError;
use thiserror::Error;

/// Declared configuration could not be turned into an API request.
///
/// Raised before any remote call is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// An instance ID is not an integer literal
    #[error("invalid instance id `{value}`: {source}")]
    InvalidInstanceId {
        /// The offending value
        value: String,
        /// Parse failure
        source: ParseIntError,
    },

    /// The configuration violates the declared schema
    #[error("invalid firewall configuration: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for BuildError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Failure of a resource lifecycle operation.
///
/// Remote not-found never appears here; it is absorbed by the controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// Request could not be built from local state
    #[error("Error in firewall request: {0}")]
    Build(#[from] BuildError),

    /// Remote create failed
    #[error("Error creating firewall: {0}")]
    Create(#[source] Error),

    /// Remote read failed
    #[error("Error retrieving firewall: {0}")]
    Retrieve(#[source] Error),

    /// Remote update failed
    #[error("Error updating firewall: {0}")]
    Update(#[source] Error),

    /// Remote delete failed
    #[error("Error deleting firewall: {0}")]
    Delete(#[source] Error),

    /// Operation needs a remote identity but the resource has none
    #[error("firewall has no remote id")]
    MissingId,

    /// Import ID is malformed
    #[error("Error importing firewall: {0}")]
    InvalidImportId(#[source] Error),

    /// Import target does not exist remotely
    #[error("Cannot import non-existent firewall {0}")]
    ImportNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_display_is_prefixed() {
        let source = "web-1".parse::<i64>().unwrap_err();
        let err = ResourceError::from(BuildError::InvalidInstanceId {
            value: "web-1".into(),
            source,
        });
        assert_eq!(
            err.to_string(),
            "Error in firewall request: invalid instance id `web-1`: invalid digit found in string"
        );
    }

    #[test]
    fn remote_error_is_wrapped() {
        let err = ResourceError::Update(Error::Conflict("busy".into()));
        assert_eq!(err.to_string(), "Error updating firewall: Conflict: busy");
    }
}
