// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Engine Seam
//!
//! The stack declares desired state; an engine converges actual state to
//! match or reports an error. [`Provisioner`] is that seam: one async
//! create/delete pair per resource, no update or drift reconciliation —
//! those belong to the engine behind the trait.
//!
//! # Architecture
//!
//! ```text
//! Stack → creation_order() → apply() ─┬─ Provisioner::create() per resource
//!                                     └─ rollback via delete() on failure
//! ```
//!
//! [`MemoryProvisioner`] is the in-process reference implementation used by
//! tests.

pub mod apply;
pub mod memory;

pub use apply::{apply, destroy, ApplyEvent, ApplyEventKind, ApplyReport, DestroyReport};
pub use memory::MemoryProvisioner;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::Ipv4Addr;
use thiserror::Error;

use crate::domain::ResourceName;
use crate::resources::{Resource, ResourceKind};
use crate::state_machine::resource_lifecycle::ResourceState;

/// Errors the engine can report
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Create call failed (quota, invalid range, unavailable image, ...)
    #[error("Create failed for {resource}: {reason}")]
    CreateFailed { resource: String, reason: String },

    /// Delete call failed
    #[error("Delete failed for {resource}: {reason}")]
    DeleteFailed { resource: String, reason: String },
}

/// Record of a resource the engine converged
///
/// Carries the identity, lifecycle state, and — for instances that declared
/// an access config — the ephemeral public address the engine assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedResource {
    /// Resource kind
    pub kind: ResourceKind,

    /// Resource identity
    pub name: ResourceName,

    /// Lifecycle state the resource reached
    pub state: ResourceState,

    /// When the engine reported convergence
    pub created_at: DateTime<Utc>,

    /// Assigned ephemeral public address, if one was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<Ipv4Addr>,
}

impl AppliedResource {
    /// Check whether the resource reached a ready access config
    pub fn has_ready_access_config(&self) -> bool {
        self.state == ResourceState::Ready && self.public_ip.is_some()
    }
}

/// Provisioning engine interface
///
/// Implementations own convergence, retries, and whatever parallelism they
/// want internally; the stack calls them sequentially in dependency order.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Converge one declared resource and report the result
    async fn create(&self, resource: &Resource) -> Result<AppliedResource, EngineError>;

    /// Tear down one previously created resource
    async fn delete(&self, applied: &AppliedResource) -> Result<(), EngineError>;
}
