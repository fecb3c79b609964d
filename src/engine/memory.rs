// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Provisioning Engine
//!
//! Reference implementation of [`Provisioner`] used by tests and local
//! dry-runs. Creates are bookkeeping only: the engine records what it was
//! asked to converge, assigns deterministic ephemeral addresses to instances
//! that request one, and supports failure injection by resource name so the
//! rollback path can be exercised.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use tracing::debug;

use super::{AppliedResource, EngineError, Provisioner};
use crate::resources::Resource;
use crate::state_machine::resource_lifecycle::ResourceState;

/// In-process provisioning engine
pub struct MemoryProvisioner {
    fail_on: HashSet<String>,
    live: Mutex<Vec<AppliedResource>>,
    next_host: Mutex<u8>,
}

impl MemoryProvisioner {
    /// First host octet of the addresses the engine hands out
    const FIRST_HOST: u8 = 10;

    /// Create an engine that converges everything it is asked to
    pub fn new() -> Self {
        Self {
            fail_on: HashSet::new(),
            live: Mutex::new(Vec::new()),
            next_host: Mutex::new(Self::FIRST_HOST),
        }
    }

    /// Create an engine that fails the create call for the named resources
    pub fn failing_on<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_on: names.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    /// Names of resources currently standing, in creation order
    pub fn live_resources(&self) -> Vec<String> {
        self.live
            .lock()
            .expect("provisioner lock poisoned")
            .iter()
            .map(|r| r.name.to_string())
            .collect()
    }

    fn allocate_address(&self) -> Ipv4Addr {
        let mut next = self.next_host.lock().expect("provisioner lock poisoned");
        let address = Ipv4Addr::new(203, 0, 113, *next);
        *next = next.wrapping_add(1);
        address
    }
}

impl Default for MemoryProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provisioner for MemoryProvisioner {
    async fn create(&self, resource: &Resource) -> Result<AppliedResource, EngineError> {
        let name = resource.name().to_string();

        if self.fail_on.contains(&name) {
            return Err(EngineError::CreateFailed {
                resource: name,
                reason: "injected failure".to_string(),
            });
        }

        let public_ip = match resource {
            Resource::Instance(instance) if instance.has_public_address() => {
                Some(self.allocate_address())
            }
            _ => None,
        };

        let record = AppliedResource {
            kind: resource.kind(),
            name: resource.name().clone(),
            state: ResourceState::Ready,
            created_at: Utc::now(),
            public_ip,
        };

        debug!(name = %record.name, kind = %record.kind, "Converged resource");
        self.live
            .lock()
            .expect("provisioner lock poisoned")
            .push(record.clone());

        Ok(record)
    }

    async fn delete(&self, applied: &AppliedResource) -> Result<(), EngineError> {
        let mut live = self.live.lock().expect("provisioner lock poisoned");

        let position = live.iter().position(|r| r.name == applied.name);
        match position {
            Some(index) => {
                live.remove(index);
                debug!(name = %applied.name, "Deleted resource");
                Ok(())
            }
            None => Err(EngineError::DeleteFailed {
                resource: applied.name.to_string(),
                reason: "resource does not exist".to_string(),
            }),
        }
    }
}
