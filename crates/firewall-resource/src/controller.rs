//! Firewall resource lifecycle.
//!
//! [`FirewallController`] drives create/read/update/delete/exists/import for
//! one [`FirewallResource`] at a time against a [`FirewallApi`]. Each call is
//! a plain request/response sequence: no retries, no polling of pending
//! changes.
//!
//! Remote not-found is never an error here. On read and exists it clears the
//! resource identity; on delete it counts as success.

use firewall_api::{Firewall, FirewallApi};
use firewall_core::FirewallId;
use tracing::{debug, info, warn};

use crate::error::ResourceError;
use crate::request::build_request;
use crate::rules::reconcile_direction;
use crate::schema::Direction;
use crate::state::{
    ComputedState, FirewallConfig, FirewallResource, Lifecycle, PendingChangeRecord, RuleConfig,
};

/// Result alias for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Lifecycle controller over a remote firewall API.
#[derive(Debug, Clone)]
pub struct FirewallController<A> {
    api: A,
}

impl<A> FirewallController<A>
where
    A: FirewallApi,
{
    /// Create a controller over the given API.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Access the underlying API.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Create the remote firewall, then read it back.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::Build`] before any remote call if the
    /// configuration is malformed, or [`ResourceError::Create`] if the API
    /// rejects it. The resource stays absent in both cases.
    pub async fn create(&self, resource: &mut FirewallResource) -> Result<()> {
        resource.lifecycle = Lifecycle::Creating;

        let firewall = match self.submit_create(&resource.config).await {
            Ok(firewall) => firewall,
            Err(err) => {
                resource.lifecycle = Lifecycle::Absent;
                return Err(err);
            }
        };

        resource.id = Some(firewall.id);
        resource.lifecycle = Lifecycle::Present;
        info!(id = %firewall.id, "Firewall created");

        self.read(resource).await
    }

    async fn submit_create(&self, config: &FirewallConfig) -> Result<Firewall> {
        let request = build_request(config)?;
        debug!(?request, "Firewall create configuration");
        self.api
            .create_firewall(&request)
            .await
            .map_err(ResourceError::Create)
    }

    /// Refresh local state from the remote firewall.
    ///
    /// Rules are reconciled against the current local rules so that declared
    /// ordering survives.
    ///
    /// # Errors
    ///
    /// [`ResourceError::MissingId`] if no remote resource is tracked,
    /// [`ResourceError::Retrieve`] for API failures other than not-found.
    pub async fn read(&self, resource: &mut FirewallResource) -> Result<()> {
        let id = resource.id.ok_or(ResourceError::MissingId)?;

        let firewall = match self.api.get_firewall(id).await {
            Ok(firewall) => firewall,
            Err(err) if err.is_not_found() => {
                warn!(%id, "Firewall not found, removing from state");
                resource.clear_identity();
                return Ok(());
            }
            Err(err) => return Err(ResourceError::Retrieve(err)),
        };

        apply_remote(resource, firewall);
        Ok(())
    }

    /// Push the declared configuration to the remote firewall, then read it
    /// back.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Build`] or [`ResourceError::Update`]; local state is
    /// left untouched on failure.
    pub async fn update(&self, resource: &mut FirewallResource) -> Result<()> {
        let id = resource.id.ok_or(ResourceError::MissingId)?;
        resource.lifecycle = Lifecycle::Updating;

        let outcome = self.submit_update(id, &resource.config).await;
        resource.lifecycle = Lifecycle::Present;
        if let Err(err) = outcome {
            // Remote state after a failed update is unknown; it is not re-read.
            warn!(%id, error = %err, "Firewall update failed");
            return Err(err);
        }

        self.read(resource).await
    }

    async fn submit_update(&self, id: FirewallId, config: &FirewallConfig) -> Result<Firewall> {
        let request = build_request(config)?;
        debug!(%id, ?request, "Firewall update configuration");
        self.api
            .update_firewall(id, &request)
            .await
            .map_err(ResourceError::Update)
    }

    /// Delete the remote firewall.
    ///
    /// Deleting a firewall that is already gone, remotely or locally,
    /// succeeds.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Delete`] for API failures other than not-found.
    pub async fn delete(&self, resource: &mut FirewallResource) -> Result<()> {
        let Some(id) = resource.id else {
            debug!("Firewall has no id, nothing to delete");
            return Ok(());
        };

        info!(%id, "Deleting firewall");
        resource.lifecycle = Lifecycle::Deleting;

        match self.api.delete_firewall(id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                warn!(%id, "Firewall already deleted");
            }
            Err(err) => {
                resource.lifecycle = Lifecycle::Present;
                return Err(ResourceError::Delete(err));
            }
        }

        resource.clear_identity();
        resource.computed = ComputedState::default();
        Ok(())
    }

    /// Check whether the remote firewall still exists.
    ///
    /// Clears the identity when it does not; rule state is not touched.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Retrieve`] for API failures other than not-found.
    pub async fn exists(&self, resource: &mut FirewallResource) -> Result<bool> {
        let Some(id) = resource.id else {
            return Ok(false);
        };

        info!(%id, "Checking firewall exists");
        match self.api.get_firewall(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => {
                warn!(%id, "Firewall not found, removing from state");
                resource.clear_identity();
                Ok(false)
            }
            Err(err) => Err(ResourceError::Retrieve(err)),
        }
    }

    /// Adopt an existing remote firewall by ID.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidImportId`] for a malformed ID,
    /// [`ResourceError::ImportNotFound`] if nothing exists under it, or any
    /// read failure.
    pub async fn import(&self, id: &str) -> Result<FirewallResource> {
        let id = FirewallId::parse_str(id).map_err(ResourceError::InvalidImportId)?;
        let mut resource = FirewallResource::with_id(id);

        self.read(&mut resource).await?;
        if !resource.is_present() {
            return Err(ResourceError::ImportNotFound(id.to_string()));
        }

        info!(%id, "Firewall imported");
        Ok(resource)
    }
}

/// Overwrite local state with the remote firewall, reconciling rule sets
/// against the current local rules.
fn apply_remote(resource: &mut FirewallResource, firewall: Firewall) {
    let config = &mut resource.config;

    let remote_inbound = firewall.inbound_rules.iter().map(RuleConfig::from_inbound).collect();
    let remote_outbound = firewall.outbound_rules.iter().map(RuleConfig::from_outbound).collect();
    config.inbound_rules = reconcile_direction(Direction::Inbound, &config.inbound_rules, remote_inbound);
    config.outbound_rules =
        reconcile_direction(Direction::Outbound, &config.outbound_rules, remote_outbound);

    config.name = firewall.name;
    config.instance_ids = firewall.instance_ids.iter().map(ToString::to_string).collect();
    config.tags = firewall.tags;

    resource.computed = ComputedState {
        status: firewall.status,
        created_at: firewall
            .created_at
            .map(|created| created.to_rfc3339())
            .unwrap_or_default(),
        pending_changes: firewall
            .pending_changes
            .into_iter()
            .map(PendingChangeRecord::from)
            .collect(),
    };
    resource.id = Some(firewall.id);
    resource.lifecycle = Lifecycle::Present;
}
