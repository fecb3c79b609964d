// Copyright (c) 2025 - Cowboy AI, Inc.
//! Output Values
//!
//! Read-only projection of the applied instance: its name and assigned
//! public address, computed after provisioning completes. Pure function of
//! the apply report — no I/O.

use serde::Serialize;
use std::net::Ipv4Addr;

use crate::engine::ApplyReport;

/// Values surfaced to the operator after a successful apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackOutputs {
    /// Name of the inference instance
    pub instance_name: String,

    /// Ephemeral public address assigned to the instance; `None` until the
    /// instance reports a ready access config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_public_ip: Option<Ipv4Addr>,
}

impl StackOutputs {
    /// Project outputs from an apply report
    ///
    /// Returns `None` when the run did not leave an instance standing.
    /// `instance_public_ip` is populated only when the applied instance
    /// reached `Ready` with an assigned access-config address.
    pub fn project(report: &ApplyReport) -> Option<Self> {
        let instance = report.instance()?;

        let instance_public_ip = if instance.has_ready_access_config() {
            instance.public_ip
        } else {
            None
        };

        Some(Self {
            instance_name: instance.name.to_string(),
            instance_public_ip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceName;
    use crate::engine::AppliedResource;
    use crate::resources::ResourceKind;
    use crate::state_machine::resource_lifecycle::ResourceState;
    use chrono::Utc;
    use uuid::Uuid;

    fn report_with(applied: Vec<AppliedResource>) -> ApplyReport {
        ApplyReport {
            run_id: Uuid::now_v7(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            applied,
            events: Vec::new(),
            error: None,
        }
    }

    fn applied_instance(state: ResourceState, public_ip: Option<Ipv4Addr>) -> AppliedResource {
        AppliedResource {
            kind: ResourceKind::Instance,
            name: ResourceName::new("tinylama-vm").unwrap(),
            state,
            created_at: Utc::now(),
            public_ip,
        }
    }

    #[test]
    fn test_outputs_after_ready_instance() {
        let ip = Ipv4Addr::new(203, 0, 113, 10);
        let report = report_with(vec![applied_instance(ResourceState::Ready, Some(ip))]);

        let outputs = StackOutputs::project(&report).unwrap();
        assert_eq!(outputs.instance_name, "tinylama-vm");
        assert_eq!(outputs.instance_public_ip, Some(ip));
    }

    #[test]
    fn test_no_outputs_without_instance() {
        let report = report_with(Vec::new());
        assert!(StackOutputs::project(&report).is_none());
    }

    #[test]
    fn test_public_ip_empty_without_access_config() {
        let report = report_with(vec![applied_instance(ResourceState::Ready, None)]);

        let outputs = StackOutputs::project(&report).unwrap();
        assert_eq!(outputs.instance_public_ip, None);
    }

    #[test]
    fn test_public_ip_empty_before_ready() {
        let ip = Ipv4Addr::new(203, 0, 113, 10);
        let report = report_with(vec![applied_instance(ResourceState::Creating, Some(ip))]);

        let outputs = StackOutputs::project(&report).unwrap();
        assert_eq!(outputs.instance_public_ip, None);
    }
}
