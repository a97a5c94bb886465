//! Firewall resource for the cloud provider plugin.
//!
//! Translates declared firewall configuration into API requests, drives the
//! create/read/update/delete lifecycle, and folds the remote rule set back
//! into the declared ordering so that reordering alone never shows up as a
//! change.
//!
//! ## Modules
//!
//! - [`fingerprint`] - Rule identity hashing over protocol and port range
//! - [`reconcile`] - Order-preserving reconciliation of scalar lists
//! - [`rules`] - Reconciliation of whole inbound/outbound rule sets
//! - [`request`] - Building API requests from declared configuration
//! - [`controller`] - Resource lifecycle against the remote API
//! - [`state`] - Typed local state
//! - [`schema`] - Declared field layout and diff suppression

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod error;
pub mod fingerprint;
pub mod reconcile;
pub mod request;
pub mod rules;
pub mod schema;
pub mod state;

pub use controller::FirewallController;
pub use error::{BuildError, ResourceError};
pub use fingerprint::fingerprint;
pub use reconcile::reconcile_lists;
pub use request::build_request;
pub use rules::reconcile_rules;
pub use schema::{suppress_port_range_diff, Direction};
pub use state::{
    ComputedState, FirewallConfig, FirewallResource, Lifecycle, PartySet, PendingChangeRecord,
    RuleConfig,
};
