//! Strongly-typed firewall identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Remote firewall UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirewallId(Uuid);

impl FirewallId {
    /// Creates a new identifier from a [`Uuid`].
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a new random identifier (v4).
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if the string is not a valid UUID.
    pub fn parse_str(input: &str) -> Result<Self> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| Error::InvalidId(input.to_string()))
    }
}

impl From<Uuid> for FirewallId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<FirewallId> for Uuid {
    fn from(id: FirewallId) -> Self {
        id.0
    }
}

impl FromStr for FirewallId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl fmt::Display for FirewallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
