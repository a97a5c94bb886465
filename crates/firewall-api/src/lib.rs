//! Cloud firewall API client and wire models.
//!
//! Provides typed request/response structures and an asynchronous client for
//! the firewall endpoints of the cloud provider API. The [`FirewallApi`] trait
//! is the seam the resource controller talks to.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{FirewallApi, FirewallApiClient, FirewallApiClientBuilder};
pub use models::{Firewall, FirewallRequest, InboundRule, OutboundRule, Parties, PendingChange};

/// Convenient result alias that reuses the shared firewall error type.
pub type Result<T> = firewall_core::Result<T>;
