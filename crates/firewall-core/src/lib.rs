//! # firewall-core
//!
//! Core types and utilities shared by the cloud firewall provider crates.
//!
//! ## Modules
//!
//! - [`error`] - Error type and HTTP status classification
//! - [`id`] - Strongly-typed firewall identifier
//! - [`config`] - Provider configuration and validation
//! - [`client`] - HTTP client settings and defaults

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod id;

// Re-export commonly used types
pub use error::{Error, Result};
pub use id::FirewallId;
